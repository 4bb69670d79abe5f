#![allow(dead_code)]

use needs_core::model::need::Need;
use needs_core::model::reference::{Entity, SuperGroup, UserGroup, WorkflowPhase};
use needs_core::snapshot::Snapshot;

#[derive(Clone, Copy, Debug)]
pub struct CatalogTier {
    pub name: &'static str,
    pub need_count: usize,
    pub group_count: usize,
    pub entity_count: usize,
}

pub const TIER_S: CatalogTier = CatalogTier {
    name: "S",
    need_count: 200,
    group_count: 8,
    entity_count: 24,
};

pub const TIER_M: CatalogTier = CatalogTier {
    name: "M",
    need_count: 2_000,
    group_count: 24,
    entity_count: 80,
};

pub const TIER_L: CatalogTier = CatalogTier {
    name: "L",
    need_count: 20_000,
    group_count: 64,
    entity_count: 240,
};

pub const TIERS: [CatalogTier; 3] = [TIER_S, TIER_M, TIER_L];

#[derive(Clone, Copy, Debug)]
struct Prng(u64);

impl Prng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Numerical Recipes LCG.
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0
    }

    #[allow(clippy::cast_possible_truncation)]
    fn next_index(&mut self, upper_exclusive: usize) -> usize {
        if upper_exclusive == 0 {
            return 0;
        }
        (self.next_u64() as usize) % upper_exclusive
    }

    fn chance(&mut self, numerator: u64, denominator: u64) -> bool {
        debug_assert!(numerator <= denominator);
        self.next_u64() % denominator < numerator
    }
}

const SUPER_GROUPS: &[(&str, &str, &str)] = &[
    ("aykua", "Aykua", "AYK"),
    ("partner_network", "Partner Network", "PRT"),
    ("medical_services_user", "Medical Services", "MED"),
];

const PHASES: &[(&str, i64)] = &[
    ("intake", 1),
    ("triage", 2),
    ("visit", 3),
    ("billing", 4),
    ("handoff", 5),
];

/// Deterministic synthetic catalog for one tier. Roughly one in eight
/// groups has no super group, so the `Unknown` rollup path stays hot.
pub fn generate_catalog(tier: CatalogTier, seed: u64) -> Snapshot {
    let mut prng = Prng::new(seed);

    let user_super_groups: Vec<SuperGroup> = SUPER_GROUPS
        .iter()
        .map(|(id, name, prefix)| SuperGroup {
            id: (*id).to_string(),
            name: (*name).to_string(),
            prefix: (*prefix).to_string(),
        })
        .collect();

    let user_groups: Vec<UserGroup> = (0..tier.group_count)
        .map(|i| {
            let super_group = if prng.chance(7, 8) {
                Some(SUPER_GROUPS[prng.next_index(SUPER_GROUPS.len())].0.to_string())
            } else {
                None
            };
            UserGroup {
                id: format!("group-{i:03}"),
                name: format!("Group {i:03}"),
                description: None,
                super_group,
            }
        })
        .collect();

    let entities: Vec<Entity> = (0..tier.entity_count)
        .map(|i| Entity {
            id: format!("entity-{i:03}"),
            name: format!("Entity {i:03}"),
            description: None,
        })
        .collect();

    let workflow_phases: Vec<WorkflowPhase> = PHASES
        .iter()
        .map(|(id, order)| WorkflowPhase {
            id: (*id).to_string(),
            name: (*id).to_string(),
            order: *order,
        })
        .collect();

    let user_needs: Vec<Need> = (0..tier.need_count)
        .map(|i| {
            let entity_count = prng.next_index(4);
            let entities = (0..entity_count)
                .map(|_| format!("entity-{:03}", prng.next_index(tier.entity_count)))
                .collect();
            Need {
                id: format!("SYN-{i:05}"),
                user_group_id: format!("group-{:03}", prng.next_index(tier.group_count)),
                title: format!("need {i}"),
                description: String::new(),
                entities,
                workflow_phase: PHASES[prng.next_index(PHASES.len())].0.to_string(),
                refined: if prng.chance(3, 5) { Some(true) } else { None },
                ..Need::default()
            }
        })
        .collect();

    Snapshot {
        user_groups,
        user_super_groups,
        entities,
        workflow_phases,
        user_needs,
    }
}
