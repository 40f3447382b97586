//! Line item tree display
//!
//! Renders the allocation tree with position paths (`1`, `1.2`), amounts,
//! cost types and per-node overflow.

use crate::models::{Currency, LineItem, LineItemTree};

/// Format the tree with one line per item, children indented under parents
pub fn format_line_item_tree(tree: &LineItemTree, currency: Currency) -> String {
    let mut rows = Vec::new();
    collect_rows(tree.items(), "", 0, currency, &mut rows);

    let label_width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(4).max(4);
    let amount_width = rows.iter().map(|r| r.amount.chars().count()).max().unwrap_or(6).max(6);

    let mut output = String::new();
    for row in rows {
        output.push_str(&format!(
            "{:<label_width$}  {:>amount_width$}{}\n",
            row.label,
            row.amount,
            row.notes,
            label_width = label_width,
            amount_width = amount_width,
        ));
    }
    output
}

struct Row {
    label: String,
    amount: String,
    notes: String,
}

fn collect_rows(
    items: &[LineItem],
    prefix: &str,
    depth: usize,
    currency: Currency,
    rows: &mut Vec<Row>,
) {
    for (i, item) in items.iter().enumerate() {
        let path = if prefix.is_empty() {
            format!("{}", i + 1)
        } else {
            format!("{}.{}", prefix, i + 1)
        };
        let name = if item.name.is_empty() {
            "(unnamed)"
        } else {
            item.name.as_str()
        };

        let mut notes = String::new();
        if let Some(cost_type) = item.cost_type {
            notes.push_str(&format!("  [{}]", cost_type));
        }
        if item.has_children() {
            let overflow = item.overflow();
            if overflow.is_negative() {
                notes.push_str(&format!("  !! over by {}", (-overflow).format_with_symbol(currency.symbol())));
            } else {
                notes.push_str(&format!("  unallocated {}", overflow.format_with_sign()));
            }
        }
        if !item.linked_entity_ids.is_empty() {
            notes.push_str(&format!("  ({} linked)", item.linked_entity_ids.len()));
        }

        rows.push(Row {
            label: format!("{}{} {}", "  ".repeat(depth), path, name),
            amount: item.amount.format_with_symbol(currency.symbol()),
            notes,
        });

        collect_rows(&item.children, &path, depth + 1, currency, rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostType, Money};

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    #[test]
    fn test_nested_paths_and_overflow() {
        let tree = LineItemTree::from_items(vec![
            LineItem::new()
                .named("Hardware Upgrades")
                .with_amount(units(150_000))
                .with_cost_type(Some(CostType::Hard))
                .with_children(vec![
                    LineItem::new().named("Servers").with_amount(units(100_000)),
                    LineItem::new().named("Workstations").with_amount(units(80_000)),
                ]),
            LineItem::new(),
        ]);

        let output = format_line_item_tree(&tree, Currency::Usd);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("1 Hardware Upgrades"));
        assert!(lines[0].contains("$150,000.00"));
        assert!(lines[0].contains("[Hard]"));
        assert!(lines[0].contains("!! over by $30,000.00"));
        assert!(lines[1].starts_with("  1.1 Servers"));
        assert!(lines[2].starts_with("  1.2 Workstations"));
        assert!(lines[3].starts_with("2 (unnamed)"));
    }

    #[test]
    fn test_unallocated_remainder() {
        let tree = LineItemTree::from_items(vec![LineItem::new()
            .named("Marketing Materials")
            .with_amount(units(200_000))
            .with_children(vec![LineItem::new().named("Print").with_amount(units(120_000))])]);

        let output = format_line_item_tree(&tree, Currency::Eur);
        assert!(output.contains("€200,000.00"));
        assert!(output.contains("unallocated +80,000"));
    }
}
