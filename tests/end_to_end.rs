//! Population of 12 → three groups → allocation of mixed-complexity work.

use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use u_teamform::allocation::{AllocationConfig, TaskAllocator};
use u_teamform::compatibility::{CompatibilityMatrix, CompatibilityModel};
use u_teamform::formation::ga::GaConfig;
use u_teamform::formation::{
    EvolutionaryFormation, FormationConfig, FormationKpi, FormationStrategy, GreedyFormation,
};
use u_teamform::models::{Complexity, Individual, PersonalityProfile, Proficiency, WorkItem};
use u_teamform::{PlanRequest, TeamPlanner};

fn cohort() -> Vec<Individual> {
    let skills = ["Python", "JavaScript", "SQL", "React", "Testing", "Design"];
    let tiers = [
        Proficiency::Beginner,
        Proficiency::Intermediate,
        Proficiency::Advanced,
        Proficiency::Expert,
    ];
    let days = ["Mon", "Tue", "Wed"];
    (0..12)
        .map(|i| {
            Individual::new(format!("STU{i:03}"))
                .with_name(format!("Student {i}"))
                .with_year_level(2 + (i % 3) as u8)
                .with_ability(1.0 + (i % 7) as f64 * 0.5)
                .with_skill(skills[i % 6], tiers[i % 4])
                .with_skill(skills[(i + 2) % 6], tiers[(i + 1) % 4])
                .with_available_slot(days[i % 3], "AM")
                .with_available_slot(days[(i + 1) % 3], "PM")
                .with_personality(
                    PersonalityProfile::new()
                        .with_conscientiousness(2.0 + (i % 4) as f64 * 0.75)
                        .with_agreeableness(5.0 - (i % 5) as f64 * 0.5)
                        .with_extraversion(1.0 + (i % 3) as f64),
                )
        })
        .collect()
}

fn work_items() -> Vec<WorkItem> {
    vec![
        WorkItem::new("T1", Complexity::Low, 4.0).with_name("Write README").with_skill("Design"),
        WorkItem::new("T2", Complexity::Medium, 10.0).with_name("Schema").with_skill("SQL"),
        WorkItem::new("T3", Complexity::High, 20.0)
            .with_name("Backend API")
            .with_skills(["Python", "SQL"]),
        WorkItem::new("T4", Complexity::Medium, 8.0).with_name("Test suite").with_skill("Testing"),
        WorkItem::new("T5", Complexity::High, 18.0)
            .with_name("Frontend")
            .with_skills(["React", "JavaScript"]),
        WorkItem::new("T6", Complexity::High, 16.0).with_name("Integration"),
    ]
}

#[test]
fn test_twelve_individuals_form_three_groups_and_allocate() {
    let population = cohort();
    let config = FormationConfig::new(3, 4, 5);
    let matrix = CompatibilityMatrix::build(&population, &CompatibilityModel::new());
    let mut rng = SmallRng::seed_from_u64(42);

    let formation = GreedyFormation::new(config.clone())
        .form(&population, &matrix, &mut rng)
        .unwrap();

    assert_eq!(formation.group_count(), 3);
    assert!(formation.groups.iter().all(|g| g.within_bounds(3, 5)));
    assert!(formation.covers_exactly(&population));

    let seen: HashSet<&str> = formation
        .groups
        .iter()
        .flat_map(|g| g.members.iter().map(String::as_str))
        .collect();
    assert_eq!(seen.len(), 12);

    let group = formation
        .groups
        .iter()
        .find(|g| g.size() == 4)
        .unwrap();
    let allocation = TaskAllocator::new(AllocationConfig::default())
        .allocate(group, &population, &work_items())
        .unwrap();

    assert_eq!(allocation.assignment_count(), 6);
    let complexities: Vec<Complexity> = allocation
        .assignments
        .iter()
        .map(|a| {
            work_items()
                .into_iter()
                .find(|w| w.id == a.work_item_id)
                .map(|w| w.complexity)
                .unwrap()
        })
        .collect();
    assert_eq!(
        complexities,
        vec![
            Complexity::High,
            Complexity::High,
            Complexity::High,
            Complexity::Medium,
            Complexity::Medium,
            Complexity::Low,
        ]
    );
    // input order kept within a tier
    let ids: Vec<&str> = allocation.assignments.iter().map(|a| a.work_item_id.as_str()).collect();
    assert_eq!(&ids[..3], &["T3", "T5", "T6"]);
    assert!(allocation.assignments.iter().all(|a| group.contains(&a.member_id)));
}

#[test]
fn test_population_of_min_size_forms_single_group() {
    let population: Vec<Individual> = cohort().into_iter().take(3).collect();
    let matrix = CompatibilityMatrix::build(&population, &CompatibilityModel::new());
    let mut rng = SmallRng::seed_from_u64(0);

    for strategy in [
        Box::new(GreedyFormation::new(FormationConfig::default())) as Box<dyn FormationStrategy>,
        Box::new(
            EvolutionaryFormation::new(FormationConfig::default())
                .with_ga(GaConfig::default().with_population_size(10).with_max_generations(5)),
        ),
    ] {
        let formation = strategy.form(&population, &matrix, &mut rng).unwrap();
        assert_eq!(formation.group_count(), 1, "{}", strategy.name());
        assert_eq!(formation.groups[0].size(), 3);
    }
}

#[test]
fn test_strategies_are_interchangeable() {
    let request = PlanRequest::new(cohort()).with_shared_items(work_items());
    let greedy = TeamPlanner::greedy(FormationConfig::default())
        .with_seed(7)
        .plan(&request)
        .unwrap();
    let evolutionary = TeamPlanner::evolutionary(
        FormationConfig::default(),
        GaConfig::default().with_population_size(30).with_max_generations(40),
    )
    .with_seed(7)
    .plan(&request)
    .unwrap();

    for plan in [&greedy, &evolutionary] {
        assert!(plan.formation.covers_exactly(&request.population));
        assert_eq!(plan.allocations.len(), plan.formation.group_count());
        assert!(plan.allocations.iter().all(|a| a.assignment_count() == 6));
    }

    let delta = evolutionary.kpi.improvement_over(&greedy.kpi);
    assert!(delta.is_some());
    assert_eq!(
        FormationKpi::calculate(&greedy.formation, &FormationConfig::default()),
        greedy.kpi
    );
}

#[test]
fn test_plan_serializes() {
    let request = PlanRequest::new(cohort()).with_shared_items(work_items());
    let plan = TeamPlanner::greedy(FormationConfig::default())
        .with_seed(3)
        .plan(&request)
        .unwrap();

    let json = serde_json::to_string(&plan).unwrap();
    assert!(json.contains("\"strategy\":\"greedy\""));
    let roundtrip: u_teamform::Plan = serde_json::from_str(&json).unwrap();
    assert_eq!(roundtrip.formation, plan.formation);
}
