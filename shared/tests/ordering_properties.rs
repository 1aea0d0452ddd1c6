use proptest::prelude::*;
use proptest::test_runner::Config;
use shared::models::DisplayOrderItem;
use shared::ordering::{
    apply_plan, array_move, diff_positions, is_dense, plan_delete, plan_insert, plan_move,
    plan_normalize, plan_reorder,
};

fn dense(n: usize) -> Vec<DisplayOrderItem> {
    (0..n)
        .map(|i| DisplayOrderItem::new(format!("id{i}"), i as u32 + 1))
        .collect()
}

fn ids(items: &[DisplayOrderItem]) -> Vec<String> {
    items.iter().map(|i| i.id.clone()).collect()
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u32),
    Move(usize, u32),
    Delete(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1_u32..40).prop_map(Op::Insert),
        (any::<usize>(), 1_u32..40).prop_map(|(i, p)| Op::Move(i, p)),
        any::<usize>().prop_map(Op::Delete),
    ]
}

/// A dense list and a permutation of its ids
fn synced_and_shuffled() -> impl Strategy<Value = (Vec<DisplayOrderItem>, Vec<String>)> {
    (0_usize..15).prop_flat_map(|n| {
        let synced = dense(n);
        let order = Just(ids(&synced)).prop_shuffle();
        (Just(synced), order)
    })
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn operation_sequences_stay_dense(
        start in 0_usize..12,
        ops in prop::collection::vec(op(), 1..30),
    ) {
        let mut list = dense(start);
        let mut next_id = start;

        for op in ops {
            match op {
                Op::Insert(target) => {
                    let plan = plan_insert(&list, target).expect("insert plan");
                    prop_assert!(plan.shifts.iter().all(|c| c.from != c.to));
                    apply_plan(&mut list, &plan.shifts);
                    list.push(DisplayOrderItem::new(format!("id{next_id}"), plan.position));
                    next_id += 1;
                    list.sort_by_key(|i| i.display_order);
                }
                Op::Move(index, new) => {
                    if list.is_empty() {
                        continue;
                    }
                    let entry = list[index % list.len()].clone();
                    let new = (new - 1) % list.len() as u32 + 1;
                    let plan = plan_move(&list, &entry.id, entry.display_order, new)
                        .expect("move plan");
                    prop_assert!(plan.changes().iter().all(|c| c.from != c.to));
                    apply_plan(&mut list, &plan.changes());
                }
                Op::Delete(index) => {
                    if list.is_empty() {
                        continue;
                    }
                    let id = list[index % list.len()].id.clone();
                    let plan = plan_delete(&list, &id).expect("delete plan");
                    prop_assert!(plan.shifts.iter().all(|c| c.from != c.to));
                    list.retain(|i| i.id != id);
                    apply_plan(&mut list, &plan.shifts);
                }
            }
            prop_assert!(is_dense(&list), "not dense: {:?}", list);
        }
    }

    #[test]
    fn move_matches_array_move(n in 1_usize..20, from in any::<usize>(), to in any::<usize>()) {
        let list = dense(n);
        let from = from % n;
        let to = to % n;

        let mut expected = ids(&list);
        prop_assert!(array_move(&mut expected, from, to));

        let mut moved = list.clone();
        let plan = plan_move(&list, &list[from].id, from as u32 + 1, to as u32 + 1)
            .expect("move plan");
        apply_plan(&mut moved, &plan.changes());

        prop_assert_eq!(ids(&moved), expected);
    }

    #[test]
    fn normalize_repairs_any_positions(positions in prop::collection::vec(0_u32..50, 0..20)) {
        let mut list: Vec<DisplayOrderItem> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| DisplayOrderItem::new(format!("id{i:02}"), *p))
            .collect();

        let changes = plan_normalize(&list);
        apply_plan(&mut list, &changes);

        prop_assert!(is_dense(&list));
    }

    #[test]
    fn reorder_diff_matches_commit_diff((synced, order) in synced_and_shuffled()) {
        let changes = plan_reorder(&synced, &order).expect("reorder plan");
        let mut working = synced.clone();
        apply_plan(&mut working, &changes);

        prop_assert!(is_dense(&working));
        prop_assert_eq!(ids(&working), order);
        prop_assert_eq!(diff_positions(&synced, &working).changes, changes);
    }
}
