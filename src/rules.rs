//! Accept/ignore rule evaluation over the task universe.

use std::collections::BTreeSet;

use crate::config::Rule;

/// Task identity: (benchmark name, item name). Unique within a selection.
pub type TaskId = (String, String);

fn rule_matches(rule: &Rule, task: &TaskId) -> bool {
    let (benchmark, item) = task;
    if *benchmark != rule.benchmark {
        return false;
    }
    match rule.list.as_deref() {
        None | Some([]) => true,
        Some(names) => names.iter().any(|n| n == item),
    }
}

/// Union, over all rules, of universe members matching at least one rule.
///
/// Rule order never affects the result; a rule naming a benchmark absent from
/// the universe matches nothing.
pub fn apply_rules(universe: &BTreeSet<TaskId>, rules: &[Rule]) -> BTreeSet<TaskId> {
    universe
        .iter()
        .filter(|task| rules.iter().any(|rule| rule_matches(rule, task)))
        .cloned()
        .collect()
}

/// Compose the accept and ignore passes into the final selection.
///
/// No accept rules means the whole universe is a candidate; no ignore rules
/// means nothing is removed.
pub fn select(
    universe: BTreeSet<TaskId>,
    accept: Option<&[Rule]>,
    ignore: Option<&[Rule]>,
) -> BTreeSet<TaskId> {
    let selection = match accept {
        Some(rules) => apply_rules(&universe, rules),
        None => universe,
    };
    match ignore {
        Some(rules) => {
            let removed = apply_rules(&selection, rules);
            selection.difference(&removed).cloned().collect()
        }
        None => selection,
    }
}
