//! End-to-end tests driving the full engine against the in-memory store.

#[cfg(test)]
mod tests {

    use std::collections::HashMap;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    use supplysim_catalog::{Item, ItemId};
    use supplysim_inventory::InventoryLevel;
    use supplysim_orders::{NewOrderItem, OrderId, OrderItem, OrderItemId, OrderStatus};
    use supplysim_parties::{Customer, CustomerId, Supplier, SupplierId};
    use supplysim_store::{
        AttemptOutcome, FailureReason, InMemoryStore, SimulationStore,
    };

    use crate::config::{EventWeights, NoOpAccounting, SimulationConfig};
    use crate::rng::ChaChaSource;
    use crate::simulation::Simulation;

    fn day0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn fulfillment_only() -> EventWeights {
        EventWeights {
            order_creation: 0.0,
            fulfillment_attempt: 1.0,
            restocking: 0.0,
            idle: 0.0,
        }
    }

    fn idle_only() -> EventWeights {
        EventWeights {
            order_creation: 0.0,
            fulfillment_attempt: 0.0,
            restocking: 0.0,
            idle: 1.0,
        }
    }

    /// One customer, one item, one supplier, one inventory row.
    fn minimal_store(failure_rate: f64, quantity_on_hand: u32, reorder_point: u32) -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store
            .seed_customer(Customer {
                id: CustomerId::from(1),
                name: "Dana Fox".to_string(),
                region: "North".to_string(),
            })
            .unwrap();
        store
            .seed_item(Item {
                id: ItemId::from(1),
                name: "Widget".to_string(),
                category: "Hardware".to_string(),
                unit_price: 500,
            })
            .unwrap();
        store
            .seed_supplier(Supplier {
                id: SupplierId::from(1),
                name: "Acme Logistics".to_string(),
                category: "Hardware".to_string(),
                failure_rate,
                fulfillment_weight: 1.0,
            })
            .unwrap();
        store
            .seed_inventory_level(InventoryLevel {
                item_id: ItemId::from(1),
                supplier_id: SupplierId::from(1),
                quantity_on_hand,
                reorder_point,
                restock_weight: 1.0,
                supplier_max_quantity: 10,
                last_updated: day0(),
            })
            .unwrap();
        store
    }

    /// A few customers, categories, suppliers, and items, with an inventory row
    /// for every category-compatible item/supplier pair.
    fn fleet_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        let categories = ["Electronics", "Food", "Hardware"];

        for id in 1..=5u64 {
            store
                .seed_customer(Customer {
                    id: CustomerId::from(id),
                    name: format!("Customer {id}"),
                    region: ["North", "South", "East", "West"][(id % 4) as usize].to_string(),
                })
                .unwrap();
        }
        for id in 1..=6u64 {
            store
                .seed_supplier(Supplier {
                    id: SupplierId::from(id),
                    name: format!("Supplier {id}"),
                    category: categories[((id - 1) % 3) as usize].to_string(),
                    failure_rate: 0.02 * id as f64 / 6.0,
                    fulfillment_weight: id as f64,
                })
                .unwrap();
        }
        for id in 1..=10u64 {
            let category = categories[(id % 3) as usize];
            store
                .seed_item(Item {
                    id: ItemId::from(id),
                    name: format!("Item {id}"),
                    category: category.to_string(),
                    unit_price: 100 * id,
                })
                .unwrap();
            for supplier in 1..=6u64 {
                if categories[((supplier - 1) % 3) as usize] == category {
                    store
                        .seed_inventory_level(InventoryLevel {
                            item_id: ItemId::from(id),
                            supplier_id: SupplierId::from(supplier),
                            quantity_on_hand: 5,
                            reorder_point: 3,
                            restock_weight: 0.7,
                            supplier_max_quantity: 12,
                            last_updated: day0(),
                        })
                        .unwrap();
                }
            }
        }
        store
    }

    /// Invariant checks over the last committed state.
    fn assert_invariants(store: &InMemoryStore) {
        let orders = store.committed_orders();
        let items = store.committed_order_items();

        let mut by_order: HashMap<OrderId, Vec<&OrderItem>> = HashMap::new();
        for item in &items {
            assert!(
                item.fulfilled_quantity <= item.quantity,
                "order item {} overfilled",
                item.id
            );
            by_order.entry(item.order_id).or_default().push(item);
        }

        for order in &orders {
            let lines = by_order
                .get(&order.id)
                .unwrap_or_else(|| panic!("order {} has no lines", order.id));
            let complete = lines.iter().filter(|l| l.is_fully_fulfilled()).count();
            match order.status {
                OrderStatus::Fulfilled => assert_eq!(complete, lines.len()),
                OrderStatus::Partial | OrderStatus::PartialExpired => {
                    assert!(complete > 0 && complete < lines.len())
                }
                OrderStatus::Unfulfilled | OrderStatus::Expired => assert_eq!(complete, 0),
            }
        }

        // No dangling lines either.
        let order_ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
        for item in &items {
            assert!(order_ids.contains(&item.order_id));
        }
    }

    #[test]
    fn fulfillment_scenario_fills_order_and_decrements_stock() {
        // 1 supplier with failure_rate 0, stock 5; one order asking for 3.
        let mut store = minimal_store(0.0, 5, 2);
        store
            .insert_order(
                CustomerId::from(1),
                day0(),
                &[NewOrderItem {
                    item_id: ItemId::from(1),
                    supplier_id: SupplierId::from(1),
                    quantity: 3,
                }],
            )
            .unwrap();

        let config = SimulationConfig::default()
            .with_seed(42)
            .with_iterations(5)
            .with_event_weights(fulfillment_only())
            .with_start_date(day0());
        let rng = ChaChaSource::seeded(config.seed);
        let mut simulation = Simulation::new(store, rng, config).unwrap();
        simulation.run().unwrap();

        let store = simulation.into_store();
        let line = &store.committed_order_items()[0];
        assert_eq!(line.fulfilled_quantity, 3);
        assert!(line.fulfilled_date.is_some());

        let level = &store.committed_inventory_levels()[0];
        assert_eq!(level.quantity_on_hand, 2);

        let order = &store.committed_orders()[0];
        assert_eq!(order.status, OrderStatus::Fulfilled);

        // The first attempt succeeded; the rest found an empty cache.
        let log = store.fulfillment_log();
        assert_eq!(log[0].outcome, AttemptOutcome::Success);
        assert_eq!(log[0].fulfilled_amount, 3);
        assert!(log[1..]
            .iter()
            .all(|r| r.failure_reason == Some(FailureReason::NoCandidate)));
    }

    #[test]
    fn open_orders_expire_after_fourteen_days() {
        let mut store = minimal_store(0.0, 50, 2);
        // Unfulfilled order, created at day 0.
        store
            .insert_order(
                CustomerId::from(1),
                day0(),
                &[NewOrderItem {
                    item_id: ItemId::from(1),
                    supplier_id: SupplierId::from(1),
                    quantity: 3,
                }],
            )
            .unwrap();
        // Partially fulfilled order (one of two lines complete), same age.
        let partial = store
            .insert_order(
                CustomerId::from(1),
                day0(),
                &[
                    NewOrderItem {
                        item_id: ItemId::from(1),
                        supplier_id: SupplierId::from(1),
                        quantity: 1,
                    },
                    NewOrderItem {
                        item_id: ItemId::from(1),
                        supplier_id: SupplierId::from(1),
                        quantity: 4,
                    },
                ],
            )
            .unwrap();
        let first_line = store.order_items(partial).unwrap().remove(0);
        store.record_fulfillment(first_line.id, 1, day0()).unwrap();
        store
            .set_order_status(partial, OrderStatus::Partial)
            .unwrap();

        // Clock starts at day 15; the first maintenance pass must expire both.
        let config = SimulationConfig::default()
            .with_iterations(1)
            .with_maintenance_period(1)
            .with_event_weights(idle_only())
            .with_start_date(day0() + Duration::days(15));
        let rng = ChaChaSource::seeded(config.seed);
        let mut simulation = Simulation::new(store, rng, config).unwrap();
        simulation.run().unwrap();

        let store = simulation.into_store();
        let orders = store.committed_orders();
        assert_eq!(orders[0].status, OrderStatus::Expired);
        assert_eq!(orders[1].status, OrderStatus::PartialExpired);
    }

    #[test]
    fn restocking_refills_eligible_row_to_ceiling() {
        // Stock 1 under reorder point 5, restock weight 1.0, ceiling 10.
        let store = minimal_store(0.0, 1, 5);

        let config = SimulationConfig::default()
            .with_iterations(1)
            .with_event_weights(EventWeights {
                order_creation: 0.0,
                fulfillment_attempt: 0.0,
                restocking: 1.0,
                idle: 0.0,
            })
            .with_start_date(day0());
        let rng = ChaChaSource::seeded(config.seed);
        let mut simulation = Simulation::new(store, rng, config).unwrap();
        simulation.run().unwrap();

        let store = simulation.into_store();
        let level = &store.committed_inventory_levels()[0];
        assert_eq!(level.quantity_on_hand, 10);
        assert!(level.last_updated > day0());
    }

    #[test]
    fn empty_cache_attempt_is_logged_as_no_candidate() {
        let store = minimal_store(0.0, 5, 2);

        let config = SimulationConfig::default()
            .with_iterations(1)
            .with_event_weights(fulfillment_only())
            .with_start_date(day0());
        let rng = ChaChaSource::seeded(config.seed);
        let mut simulation = Simulation::new(store, rng, config).unwrap();
        let summary = simulation.run().unwrap();

        assert_eq!(summary.recoverable_no_ops, 1);
        let store = simulation.into_store();
        let log = store.fulfillment_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].failure_reason, Some(FailureReason::NoCandidate));
        assert_eq!(log[0].order_id, None);
    }

    #[test]
    fn totally_unreliable_supplier_never_mutates_state() {
        let mut store = minimal_store(1.0, 5, 2);
        store
            .insert_order(
                CustomerId::from(1),
                day0(),
                &[NewOrderItem {
                    item_id: ItemId::from(1),
                    supplier_id: SupplierId::from(1),
                    quantity: 3,
                }],
            )
            .unwrap();

        let config = SimulationConfig::default()
            .with_iterations(10)
            .with_event_weights(fulfillment_only())
            .with_start_date(day0());
        let rng = ChaChaSource::seeded(config.seed);
        let mut simulation = Simulation::new(store, rng, config).unwrap();
        simulation.run().unwrap();

        let store = simulation.into_store();
        assert_eq!(store.committed_order_items()[0].fulfilled_quantity, 0);
        assert_eq!(store.committed_inventory_levels()[0].quantity_on_hand, 5);
        assert_eq!(store.committed_orders()[0].status, OrderStatus::Unfulfilled);
        assert_eq!(store.fulfillment_log().len(), 10);
        assert!(store
            .fulfillment_log()
            .iter()
            .all(|r| r.failure_reason == Some(FailureReason::SupplierFailure)));
    }

    #[test]
    fn redraw_accounting_consumes_extra_draws_within_one_step() {
        // No orders exist, so every fulfillment draw is a no-op; the redraw
        // budget lets one step burn through several of them.
        let store = minimal_store(0.0, 5, 2);

        let mut config = SimulationConfig::default()
            .with_iterations(1)
            .with_event_weights(fulfillment_only())
            .with_start_date(day0());
        config.no_op_accounting = NoOpAccounting::Redraw { max_attempts: 3 };
        let rng = ChaChaSource::seeded(config.seed);
        let mut simulation = Simulation::new(store, rng, config).unwrap();
        let summary = simulation.run().unwrap();

        assert_eq!(summary.steps, 1);
        assert_eq!(summary.recoverable_no_ops, 4);
    }

    #[test]
    fn same_seed_reproduces_identical_committed_outputs() {
        let run = |seed: u64| {
            let store = fleet_store();
            let config = SimulationConfig::default()
                .with_seed(seed)
                .with_iterations(500)
                .with_maintenance_period(50)
                .with_start_date(day0());
            let rng = ChaChaSource::seeded(config.seed);
            let mut simulation = Simulation::new(store, rng, config).unwrap();
            let summary = simulation.run().unwrap();
            assert_eq!(summary.handler_faults, 0);
            (summary, simulation.into_store())
        };

        let (summary_a, store_a) = run(1234);
        let (summary_b, store_b) = run(1234);

        assert_eq!(summary_a, summary_b);
        assert_eq!(store_a.fulfillment_log(), store_b.fulfillment_log());
        assert_eq!(store_a.inventory_history(), store_b.inventory_history());
        assert_eq!(store_a.committed_orders(), store_b.committed_orders());
        assert_eq!(
            store_a.committed_order_items(),
            store_b.committed_order_items()
        );

        let (_, store_c) = run(4321);
        assert_ne!(store_a.fulfillment_log(), store_c.fulfillment_log());
    }

    #[test]
    fn fulfilled_quantities_never_decrease_across_commits() {
        let store = fleet_store();
        let config = SimulationConfig::default()
            .with_seed(7)
            .with_iterations(400)
            .with_maintenance_period(20)
            .with_start_date(day0());
        let rng = ChaChaSource::seeded(config.seed);
        let mut simulation = Simulation::new(store, rng, config).unwrap();

        let mut previous: HashMap<OrderItemId, u32> = HashMap::new();
        for step in 1..=400u64 {
            simulation.step().unwrap();
            if step % 20 == 0 {
                for item in simulation.store().committed_order_items() {
                    if let Some(&before) = previous.get(&item.id) {
                        assert!(
                            item.fulfilled_quantity >= before,
                            "fulfilled_quantity regressed on line {}",
                            item.id
                        );
                    }
                    previous.insert(item.id, item.fulfilled_quantity);
                }
            }
        }
    }

    #[test]
    fn run_always_ends_with_flushed_buffer_and_final_snapshot() {
        let store = fleet_store();
        // An iteration count that is not a multiple of the maintenance period,
        // so the tail of the log only reaches the store via the final pass.
        let config = SimulationConfig::default()
            .with_seed(99)
            .with_iterations(130)
            .with_maintenance_period(50)
            .with_start_date(day0());
        let rng = ChaChaSource::seeded(config.seed);
        let mut simulation = Simulation::new(store, rng, config).unwrap();
        let summary = simulation.run().unwrap();

        let store = simulation.into_store();
        // Every applied attempt was flushed; nothing is stranded in the buffer.
        assert!(store.fulfillment_log().len() as u64 >= summary.fulfillment_attempts);

        // Two periodic passes plus the final one, over the 20 inventory rows.
        let snapshots = store.inventory_history();
        assert_eq!(snapshots.len(), 3 * 20);
        let last_stamp = snapshots.last().unwrap().timestamp;
        assert_eq!(
            snapshots.iter().filter(|s| s.timestamp == last_stamp).count(),
            20
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 32,
            ..ProptestConfig::default()
        })]

        /// Property: whatever the seed, every maintenance commit leaves the
        /// durable state satisfying the order/inventory invariants.
        #[test]
        fn committed_state_upholds_invariants_for_any_seed(seed in any::<u64>()) {
            let store = fleet_store();
            let config = SimulationConfig::default()
                .with_seed(seed)
                .with_iterations(300)
                .with_maintenance_period(50)
                .with_start_date(day0());
            let rng = ChaChaSource::seeded(config.seed);
            let mut simulation = Simulation::new(store, rng, config).unwrap();

            for step in 1..=300u64 {
                simulation.step().unwrap();
                if step % 50 == 0 {
                    assert_invariants(simulation.store());
                }
            }
        }
    }
}
