//! Range reduction: merges per-codepoint facts into minimal rule sets for
//! direct code generation.

/// One reduced rule. `input_start == input_end` is a singleton fact destined
/// for a switch case; anything else is a contiguous range guard. `output` is
/// the value for `input_start` (an offset range's output grows in lock-step
/// from there).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeRule {
    pub input_start: u32,
    pub input_end: u32,
    pub output: i64,
}

impl RangeRule {
    pub fn singleton(cp: u32, output: i64) -> Self {
        Self {
            input_start: cp,
            input_end: cp,
            output,
        }
    }

    pub fn is_singleton(&self) -> bool {
        self.input_start == self.input_end
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePolicy {
    /// Merge adjacent facts whose output grows in lock-step with the input,
    /// so the emitted code can compute `input + offset` for the whole range.
    Offset,
    /// Merge adjacent facts with identical outputs.
    FixedOutput,
}

/// Merges singleton facts into ranges. Facts are processed in strictly
/// increasing input order; they're sorted here so callers can collect them
/// in whatever order their source file provides.
pub fn reduce(mut facts: Vec<RangeRule>, policy: MergePolicy) -> Vec<RangeRule> {
    facts.sort_by_key(|fact| fact.input_start);

    let mut rules: Vec<RangeRule> = Vec::with_capacity(facts.len());
    for fact in facts {
        if let Some(last) = rules.last_mut() {
            if fact.input_start == last.input_end + 1 {
                let joins = match policy {
                    MergePolicy::FixedOutput => fact.output == last.output,
                    MergePolicy::Offset => {
                        fact.output - last.output == i64::from(fact.input_end - last.input_start)
                    }
                };
                if joins {
                    last.input_end = fact.input_end;
                    continue;
                }
            }
        }
        rules.push(fact);
    }

    rules
}

/// Splits reduced rules into singleton facts and true ranges, preserving
/// input order within each class.
pub fn split_rules(rules: Vec<RangeRule>) -> (Vec<RangeRule>, Vec<RangeRule>) {
    rules.into_iter().partition(RangeRule::is_singleton)
}

/// Groups singleton facts by output value so the emitted dispatch can share
/// one return statement across many case labels. Group order is the first
/// occurrence of each output value; inputs keep their order within a group.
pub fn group_singletons(singletons: &[RangeRule]) -> Vec<(i64, Vec<u32>)> {
    let mut order: std::collections::HashMap<i64, usize> = std::collections::HashMap::new();
    let mut groups: Vec<(i64, Vec<u32>)> = Vec::new();

    for rule in singletons {
        match order.get(&rule.output) {
            Some(&slot) => groups[slot].1.push(rule.input_start),
            None => {
                order.insert(rule.output, groups.len());
                groups.push((rule.output, vec![rule.input_start]));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(pairs: &[(u32, i64)]) -> Vec<RangeRule> {
        pairs
            .iter()
            .map(|&(cp, out)| RangeRule::singleton(cp, out))
            .collect()
    }

    #[test]
    fn lockstep_mappings_merge_into_one_offset_range() {
        // A..C each mapping to a..c: a single +0x20 range, not three cases.
        let rules = reduce(
            facts(&[(0x41, 0x61), (0x42, 0x62), (0x43, 0x63)]),
            MergePolicy::Offset,
        );
        assert_eq!(
            rules,
            vec![RangeRule {
                input_start: 0x41,
                input_end: 0x43,
                output: 0x61,
            }]
        );
    }

    #[test]
    fn alternating_case_pairs_do_not_merge() {
        // Latin Extended-A style: 0100 -> 0101, 0102 -> 0103. Not adjacent.
        let rules = reduce(facts(&[(0x100, 0x101), (0x102, 0x103)]), MergePolicy::Offset);
        assert_eq!(rules.len(), 2);
        assert!(rules.iter().all(RangeRule::is_singleton));
    }

    #[test]
    fn adjacent_but_not_lockstep_does_not_merge() {
        let rules = reduce(facts(&[(0x41, 0x61), (0x42, 0x70)]), MergePolicy::Offset);
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn fixed_output_merges_identical_values_only() {
        let rules = reduce(
            facts(&[(0x41, 9), (0x42, 9), (0x43, 9), (0x44, 5), (0x46, 5)]),
            MergePolicy::FixedOutput,
        );
        assert_eq!(
            rules,
            vec![
                RangeRule {
                    input_start: 0x41,
                    input_end: 0x43,
                    output: 9,
                },
                RangeRule::singleton(0x44, 5),
                // 0x46 is not adjacent to 0x44.
                RangeRule::singleton(0x46, 5),
            ]
        );
    }

    #[test]
    fn merged_ranges_keep_growing() {
        // A merged range must continue absorbing lock-step successors.
        let rules = reduce(
            facts(&[(0x10, 0x50), (0x11, 0x51), (0x12, 0x52), (0x13, 0x53)]),
            MergePolicy::Offset,
        );
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].input_end, 0x13);
    }

    #[test]
    fn reduced_rules_never_overlap() {
        let input: Vec<(u32, i64)> = (0..200u32)
            .map(|i| (i * 2, i64::from(i % 7)))
            .collect();
        let rules = reduce(facts(&input), MergePolicy::FixedOutput);
        for pair in rules.windows(2) {
            assert!(pair[0].input_end < pair[1].input_start);
        }
    }

    #[test]
    fn split_separates_singletons_from_ranges() {
        let rules = reduce(
            facts(&[(0x41, 0x61), (0x42, 0x62), (0x43, 0x63), (0x100, 0x101)]),
            MergePolicy::Offset,
        );
        let (singles, ranges) = split_rules(rules);
        assert_eq!(singles, vec![RangeRule::singleton(0x100, 0x101)]);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].input_start, 0x41);
    }

    #[test]
    fn grouping_key_is_the_output_value() {
        let singles = facts(&[(0x41, 1), (0x50, 2), (0x60, 1), (0x70, 2)]);
        let groups = group_singletons(&singles);
        assert_eq!(groups, vec![(1, vec![0x41, 0x60]), (2, vec![0x50, 0x70])]);
    }
}
