//! Reorder metric derivation for one inventory row.

/// Inputs of the metric computation for one item.
///
/// Master attributes are optional: a blank or non-numeric cell is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricInputs {
    pub active: bool,
    pub adc: Option<f64>,
    pub min_stock: Option<f64>,
    pub max_stock: Option<f64>,
    pub pack_size: Option<f64>,
    pub global_stock: f64,
    pub main_store_stock: f64,
    pub pending_po: f64,
}

/// Derived columns of one inventory row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryMetrics {
    pub net_stock: f64,
    pub global_stock_days: f64,
    pub main_store_stock_days: f64,
    pub reorder_needed: bool,
    pub order_qty: f64,
}

impl MetricInputs {
    pub fn compute(&self) -> InventoryMetrics {
        let net = net_stock(self.global_stock, self.pending_po);
        let reorder = reorder_needed(self.active, net, self.min_stock);
        InventoryMetrics {
            net_stock: net,
            global_stock_days: stock_days(self.global_stock, self.adc),
            main_store_stock_days: stock_days(self.main_store_stock, self.adc),
            reorder_needed: reorder,
            order_qty: order_qty(self.active, reorder, self.max_stock, net, self.pack_size),
        }
    }
}

/// Global stock plus pending PO. Main store stock is a downstream buffer and
/// is not counted.
pub fn net_stock(global_stock: f64, pending_po: f64) -> f64 {
    global_stock + pending_po
}

/// Days of supply at the current consumption rate, rounded half to even.
/// Zero when ADC is missing or not positive.
pub fn stock_days(stock: f64, adc: Option<f64>) -> f64 {
    match adc {
        Some(adc) if adc > 0.0 => (stock / adc).round_ties_even(),
        _ => 0.0,
    }
}

/// An active item whose net stock is below its minimum level.
pub fn reorder_needed(active: bool, net_stock: f64, min_stock: Option<f64>) -> bool {
    active && min_stock.is_some_and(|min| net_stock < min)
}

/// Quantity to order: the shortage to the maximum level, rounded up to whole
/// packs. Zero unless the item is active and needs a reorder, and zero when
/// the pack size is unusable or there is no shortage.
pub fn order_qty(
    active: bool,
    reorder_needed: bool,
    max_stock: Option<f64>,
    net_stock: f64,
    pack_size: Option<f64>,
) -> f64 {
    if !active || !reorder_needed {
        return 0.0;
    }
    let (Some(max_stock), Some(pack)) = (max_stock, pack_size) else {
        return 0.0;
    };
    let shortage = max_stock - net_stock;
    if pack <= 0.0 || shortage <= 0.0 {
        return 0.0;
    }
    ((shortage / pack).ceil() * pack).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn active_item(min: f64, max: f64, pack: f64) -> MetricInputs {
        MetricInputs {
            active: true,
            adc: Some(10.0),
            min_stock: Some(min),
            max_stock: Some(max),
            pack_size: Some(pack),
            ..MetricInputs::default()
        }
    }

    #[test]
    fn zero_adc_gives_zero_days() {
        let inputs = MetricInputs {
            adc: Some(0.0),
            global_stock: 50.0,
            ..MetricInputs::default()
        };
        assert_eq!(inputs.compute().global_stock_days, 0.0);
        assert_eq!(stock_days(50.0, None), 0.0);
    }

    #[test]
    fn stock_days_round_half_to_even() {
        assert_eq!(stock_days(25.0, Some(10.0)), 2.0);
        assert_eq!(stock_days(35.0, Some(10.0)), 4.0);
        assert_eq!(stock_days(36.0, Some(10.0)), 4.0);
    }

    #[test]
    fn order_rounds_up_to_whole_packs() {
        let inputs = MetricInputs {
            global_stock: 80.0,
            ..active_item(100.0, 500.0, 30.0)
        };
        let metrics = inputs.compute();
        assert!(metrics.reorder_needed);
        assert_eq!(metrics.net_stock, 80.0);
        assert_eq!(metrics.order_qty, 420.0);

        let partial = MetricInputs {
            global_stock: 85.0,
            ..active_item(100.0, 500.0, 30.0)
        };
        assert_eq!(partial.compute().order_qty, 420.0);
    }

    #[test]
    fn zero_pack_size_orders_nothing() {
        let inputs = MetricInputs {
            global_stock: 80.0,
            ..active_item(100.0, 500.0, 0.0)
        };
        let metrics = inputs.compute();
        assert!(metrics.reorder_needed);
        assert_eq!(metrics.order_qty, 0.0);
    }

    #[test]
    fn main_store_stock_is_not_netted() {
        let inputs = MetricInputs {
            global_stock: 20.0,
            main_store_stock: 1000.0,
            pending_po: 30.0,
            ..active_item(100.0, 200.0, 10.0)
        };
        let metrics = inputs.compute();
        assert_eq!(metrics.net_stock, 50.0);
        assert!(metrics.reorder_needed);
        assert_eq!(metrics.order_qty, 150.0);
    }

    #[test]
    fn missing_levels_are_conservative() {
        let no_min = MetricInputs {
            min_stock: None,
            ..active_item(100.0, 500.0, 30.0)
        };
        assert!(!no_min.compute().reorder_needed);

        let no_max = MetricInputs {
            max_stock: None,
            ..active_item(100.0, 500.0, 30.0)
        };
        let metrics = no_max.compute();
        assert!(metrics.reorder_needed);
        assert_eq!(metrics.order_qty, 0.0);
    }

    #[test]
    fn inactive_items_never_reorder() {
        let inputs = MetricInputs {
            active: false,
            ..active_item(100.0, 500.0, 30.0)
        };
        let metrics = inputs.compute();
        assert!(!metrics.reorder_needed);
        assert_eq!(metrics.order_qty, 0.0);
    }

    proptest! {
        #[test]
        fn order_qty_is_a_non_negative_pack_multiple(
            active in any::<bool>(),
            global in 0u32..10_000,
            pending in 0u32..1_000,
            min in 0u32..5_000,
            extra in 0u32..5_000,
            pack in 0u32..100,
        ) {
            let inputs = MetricInputs {
                active,
                adc: Some(1.0),
                min_stock: Some(f64::from(min)),
                max_stock: Some(f64::from(min + extra)),
                pack_size: Some(f64::from(pack)),
                global_stock: f64::from(global),
                main_store_stock: 0.0,
                pending_po: f64::from(pending),
            };
            let metrics = inputs.compute();

            prop_assert_eq!(metrics.net_stock, f64::from(global) + f64::from(pending));
            prop_assert_eq!(
                metrics.reorder_needed,
                active && metrics.net_stock < f64::from(min)
            );
            prop_assert!(metrics.order_qty >= 0.0);
            if !metrics.reorder_needed {
                prop_assert_eq!(metrics.order_qty, 0.0);
            }
            if pack > 0 {
                let packs = metrics.order_qty / f64::from(pack);
                prop_assert_eq!(packs, packs.round());
            }
        }
    }
}
