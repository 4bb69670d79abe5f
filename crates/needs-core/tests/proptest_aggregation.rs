use needs_core::filter::{NeedFilter, RefinedFilter};
use needs_core::model::need::Need;
use needs_core::model::reference::UserGroup;
use needs_core::stats::{
    Statistics, TOP_ENTITIES, UNKNOWN_SUPER_GROUP, bucket_view, ranked, rollup_by_super_group,
};
use proptest::prelude::*;

use generators::*;

fn arb_filter() -> impl Strategy<Value = NeedFilter> {
    (
        prop::option::of(prop::sample::select(GROUP_IDS.to_vec())),
        prop::option::of(prop::sample::select(ENTITY_IDS.to_vec())),
        prop::option::of(prop::sample::select(PHASE_IDS.to_vec())),
        prop::option::of(prop::sample::select(SUPER_GROUP_IDS.to_vec())),
        prop::sample::select(vec![
            RefinedFilter::All,
            RefinedFilter::Refined,
            RefinedFilter::NeedsRefinement,
        ]),
    )
        .prop_map(|(group, entity, phase, super_group, refined)| NeedFilter {
            user_group_id: group.map(str::to_string).unwrap_or_default(),
            entity: entity.map(str::to_string).unwrap_or_default(),
            workflow_phase: phase.map(str::to_string).unwrap_or_default(),
            super_group: super_group.map(str::to_string).unwrap_or_default(),
            refined,
        })
}

/// How the super-group dimension resolves for one need, spelled out
/// independently of the filter implementation.
fn owner_super_group<'a>(need: &Need, groups: &'a [UserGroup]) -> Option<&'a str> {
    groups
        .iter()
        .find(|g| g.id == need.user_group_id)
        .and_then(|g| g.super_group.as_deref())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(1000))]

    #[test]
    fn tally_sums_match_the_total(needs in arb_needs()) {
        let stats = Statistics::tally(&needs);
        prop_assert_eq!(stats.total_needs, needs.len());
        prop_assert_eq!(stats.by_user_group.values().sum::<usize>(), needs.len());
        prop_assert_eq!(stats.by_workflow_phase.values().sum::<usize>(), needs.len());
        let memberships: usize = needs.iter().map(|n| n.entities.len()).sum();
        prop_assert_eq!(stats.by_entity.values().sum::<usize>(), memberships);
    }

    #[test]
    fn rollup_preserves_totals(needs in arb_needs(), groups in arb_groups()) {
        let stats = Statistics::tally(&needs);
        let rollup = rollup_by_super_group(&stats.by_user_group, &groups);
        prop_assert_eq!(
            rollup.values().sum::<usize>(),
            stats.by_user_group.values().sum::<usize>()
        );
    }

    #[test]
    fn unknown_bucket_counts_unresolvable_needs(needs in arb_needs(), groups in arb_groups()) {
        let stats = Statistics::tally(&needs);
        let rollup = rollup_by_super_group(&stats.by_user_group, &groups);
        let unresolvable = needs
            .iter()
            .filter(|n| owner_super_group(n, &groups).is_none())
            .count();
        prop_assert_eq!(rollup.get(UNKNOWN_SUPER_GROUP).copied().unwrap_or(0), unresolvable);
    }

    #[test]
    fn rollup_ignores_cosmetic_group_fields(needs in arb_needs(), groups in arb_groups()) {
        let stats = Statistics::tally(&needs);
        let base = rollup_by_super_group(&stats.by_user_group, &groups);

        let mut redecorated = groups;
        for group in &mut redecorated {
            group.name = format!("renamed {}", group.id);
            group.description = Some("edited".to_string());
        }
        prop_assert_eq!(rollup_by_super_group(&stats.by_user_group, &redecorated), base);
    }

    #[test]
    fn matches_is_the_conjunction_of_dimensions(
        needs in arb_needs(),
        groups in arb_groups(),
        filter in arb_filter(),
    ) {
        for need in &needs {
            let expected = (filter.user_group_id.is_empty()
                    || need.user_group_id == filter.user_group_id)
                && (filter.workflow_phase.is_empty()
                    || need.workflow_phase == filter.workflow_phase)
                && (filter.entity.is_empty() || need.entities.contains(&filter.entity))
                && (filter.super_group.is_empty()
                    || owner_super_group(need, &groups) == Some(filter.super_group.as_str()))
                && filter.refined.accepts(need.is_refined());
            prop_assert_eq!(filter.matches(need, &groups), expected);
        }
    }

    #[test]
    fn tightening_a_dimension_never_grows_the_selection(
        needs in arb_needs(),
        groups in arb_groups(),
        filter in arb_filter(),
    ) {
        let tightened: Vec<&str> = filter
            .select(&needs, &groups)
            .iter()
            .map(|n| n.id.as_str())
            .collect();

        for cleared in [
            NeedFilter { user_group_id: String::new(), ..filter.clone() },
            NeedFilter { entity: String::new(), ..filter.clone() },
            NeedFilter { workflow_phase: String::new(), ..filter.clone() },
            NeedFilter { super_group: String::new(), ..filter.clone() },
            NeedFilter { refined: RefinedFilter::All, ..filter.clone() },
        ] {
            let wider: Vec<&str> = cleared
                .select(&needs, &groups)
                .iter()
                .map(|n| n.id.as_str())
                .collect();
            prop_assert!(tightened.iter().all(|id| wider.contains(id)));
        }
    }

    #[test]
    fn refined_dimension_partitions_the_selection(
        needs in arb_needs(),
        groups in arb_groups(),
        filter in arb_filter(),
    ) {
        let all = NeedFilter { refined: RefinedFilter::All, ..filter.clone() };
        let refined = NeedFilter { refined: RefinedFilter::Refined, ..filter.clone() };
        let unrefined = NeedFilter { refined: RefinedFilter::NeedsRefinement, ..filter };

        let mut split: Vec<&str> = refined
            .select(&needs, &groups)
            .iter()
            .chain(unrefined.select(&needs, &groups).iter())
            .map(|n| n.id.as_str())
            .collect();
        let mut whole: Vec<&str> = all
            .select(&needs, &groups)
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        split.sort_unstable();
        whole.sort_unstable();
        prop_assert_eq!(split, whole);
    }

    #[test]
    fn drill_constructors_are_full_replacements(id in "[a-z_]{1,12}") {
        let expectations = [
            (NeedFilter::for_user_group(id.clone()), NeedFilter {
                user_group_id: id.clone(), ..NeedFilter::default()
            }),
            (NeedFilter::for_entity(id.clone()), NeedFilter {
                entity: id.clone(), ..NeedFilter::default()
            }),
            (NeedFilter::for_workflow_phase(id.clone()), NeedFilter {
                workflow_phase: id.clone(), ..NeedFilter::default()
            }),
            (NeedFilter::for_super_group(id.clone()), NeedFilter {
                super_group: id, ..NeedFilter::default()
            }),
        ];
        for (built, expected) in expectations {
            prop_assert_eq!(built, expected);
        }
    }

    #[test]
    fn query_params_round_trip(filter in arb_filter()) {
        let params = filter.query_params();
        prop_assert_eq!(
            params.len(),
            usize::from(!filter.user_group_id.is_empty())
                + usize::from(!filter.entity.is_empty())
                + usize::from(!filter.workflow_phase.is_empty())
                + usize::from(!filter.super_group.is_empty())
                + usize::from(!filter.refined.is_default())
        );

        let mut rebuilt = NeedFilter::default();
        for (key, value) in params {
            match key {
                "userGroupId" => rebuilt.user_group_id = value,
                "entity" => rebuilt.entity = value,
                "workflowPhase" => rebuilt.workflow_phase = value,
                "superGroup" => rebuilt.super_group = value,
                "refined" => rebuilt.refined = value.parse().expect("emitted value parses"),
                other => prop_assert!(false, "unexpected query key {}", other),
            }
        }
        prop_assert_eq!(rebuilt, filter);
    }

    #[test]
    fn ranked_orders_desc_by_count_with_key_ties(needs in arb_needs()) {
        let stats = Statistics::tally(&needs);
        let rows = ranked(&stats.by_entity);
        for pair in rows.windows(2) {
            prop_assert!(
                pair[0].1 > pair[1].1 || (pair[0].1 == pair[1].1 && pair[0].0 < pair[1].0)
            );
        }
        prop_assert_eq!(rows.len(), stats.by_entity.len());
    }

    #[test]
    fn bucket_views_stay_finite_and_bounded(needs in arb_needs()) {
        let stats = Statistics::tally(&needs);
        let rows = bucket_view(
            &stats.by_entity,
            stats.total_needs,
            str::to_string,
            Some(TOP_ENTITIES),
        );
        prop_assert!(rows.len() <= TOP_ENTITIES);
        for row in rows {
            prop_assert!(row.width_pct.is_finite());
            prop_assert!(row.width_pct >= 0.0);
        }
    }
}
