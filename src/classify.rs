// 🏷️ Classifiers - small per-row category rules
// Pure functions; callers decide what a missing category means.

// ============================================================================
// PROCUREMENT TYPE (purchase requisitions / purchase orders)
// ============================================================================

/// The four account-assignment fields a PR/PO line is classified by
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentFields<'a> {
    pub material_number: &'a str,
    pub order: &'a str,
    pub cost_center: &'a str,
    pub wbs_element: &'a str,
}

/// Procurement category of a PR/PO line
///
/// 1 = stock material, 2 = maintenance order (`4…`), 3 = production order
/// (`2…`), 4 = cost centre, 5 = WBS element. `None` when nothing applies.
pub fn procurement_type(fields: &AssignmentFields<'_>) -> Option<i64> {
    let AssignmentFields {
        material_number,
        order,
        cost_center,
        wbs_element,
    } = *fields;

    if !material_number.is_empty()
        && order.is_empty()
        && cost_center.is_empty()
        && wbs_element.is_empty()
    {
        return Some(1);
    }
    if order.starts_with('4') {
        return Some(2);
    }
    if order.starts_with('2') {
        return Some(3);
    }
    if !cost_center.is_empty() {
        return Some(4);
    }
    if !wbs_element.is_empty() {
        return Some(5);
    }
    None
}

// ============================================================================
// TWO-WAY LABELS
// ============================================================================

/// Label pair for yes/no style derived columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub yes: &'static str,
    pub no: &'static str,
}

impl Labels {
    pub const fn new(yes: &'static str, no: &'static str) -> Self {
        Labels { yes, no }
    }

    pub fn pick(&self, condition: bool) -> &'static str {
        if condition {
            self.yes
        } else {
            self.no
        }
    }
}

/// `yes` when `value` has exactly `len` characters
pub fn by_length(value: &str, len: usize, labels: Labels) -> &'static str {
    labels.pick(value.chars().count() == len)
}

/// `yes` when `value` starts with `prefix`
pub fn by_prefix(value: &str, prefix: &str, labels: Labels) -> &'static str {
    labels.pick(value.starts_with(prefix))
}

/// `yes` when both flags are set to `X`
pub fn both_flagged(a: &str, b: &str, labels: Labels) -> &'static str {
    labels.pick(a == "X" && b == "X")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'a>(m: &'a str, o: &'a str, c: &'a str, w: &'a str) -> AssignmentFields<'a> {
        AssignmentFields {
            material_number: m,
            order: o,
            cost_center: c,
            wbs_element: w,
        }
    }

    #[test]
    fn test_only_material_is_stock() {
        assert_eq!(procurement_type(&fields("10012345", "", "", "")), Some(1));
    }

    #[test]
    fn test_order_prefix_wins_over_other_fields() {
        assert_eq!(procurement_type(&fields("100", "40001234", "CC1", "W1")), Some(2));
        assert_eq!(procurement_type(&fields("", "20001234", "CC1", "")), Some(3));
    }

    #[test]
    fn test_cost_center_only() {
        assert_eq!(procurement_type(&fields("", "", "8101A100", "")), Some(4));
    }

    #[test]
    fn test_wbs_only() {
        assert_eq!(procurement_type(&fields("", "", "", "P-1000")), Some(5));
    }

    #[test]
    fn test_unclassified() {
        assert_eq!(procurement_type(&fields("", "", "", "")), None);
        // order with another leading digit and nothing else
        assert_eq!(procurement_type(&fields("", "90001234", "", "")), None);
    }

    #[test]
    fn test_label_helpers() {
        let cc = Labels::new("CC", "TCC");
        assert_eq!(by_length("8101A1000", 9, cc), "CC");
        assert_eq!(by_length("8101A10", 9, cc), "TCC");

        let ewc = Labels::new("EWC", "MWC");
        assert_eq!(by_prefix("SCT0001", "SCT", ewc), "EWC");
        assert_eq!(by_prefix("M0001", "SCT", ewc), "MWC");

        let blocked = Labels::new("blocked", "unblocked");
        assert_eq!(both_flagged("X", "X", blocked), "blocked");
        assert_eq!(both_flagged("X", "", blocked), "unblocked");
    }
}
