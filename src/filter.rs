// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Admission filters and orderings for grid contents.
//!
//! A closed set of tagged variants instead of an open class hierarchy:
//! a filter is a pure predicate, a sorter is a total ordering applied to a
//! snapshot, and a composite chains children left-to-right.

use std::cmp::Ordering;
use std::fmt;

use crate::model::{CollectionHost, ItemInfo};

pub type FilterFn = Box<dyn Fn(&dyn CollectionHost, &ItemInfo) -> bool>;
pub type SorterFn = Box<dyn Fn(&dyn CollectionHost, &ItemInfo, &ItemInfo) -> Ordering>;

pub enum FilterSorter {
    Filter(FilterFn),
    Sorter(SorterFn),
    Composite(Vec<FilterSorter>),
}

impl FilterSorter {
    pub fn filter(predicate: impl Fn(&dyn CollectionHost, &ItemInfo) -> bool + 'static) -> Self {
        Self::Filter(Box::new(predicate))
    }

    pub fn sorter(
        comparator: impl Fn(&dyn CollectionHost, &ItemInfo, &ItemInfo) -> Ordering + 'static,
    ) -> Self {
        Self::Sorter(Box::new(comparator))
    }

    pub fn composite(children: Vec<FilterSorter>) -> Self {
        Self::Composite(children)
    }

    /// Whether a grid gated by this chain admits `info`. Sorters never
    /// reject; composites require every child to admit.
    pub fn can_contain(&self, host: &dyn CollectionHost, info: &ItemInfo) -> bool {
        match self {
            Self::Filter(predicate) => predicate(host, info),
            Self::Sorter(_) => true,
            Self::Composite(children) => {
                children.iter().all(|child| child.can_contain(host, info))
            }
        }
    }

    /// Apply the chain to a snapshot of `items`, never mutating the source:
    /// filtering narrows the candidate set, then sorters run in sequence.
    /// Sorts are stable, so the last sorter decides and earlier sorters
    /// break its ties.
    pub fn order(&self, host: &dyn CollectionHost, items: &[ItemInfo]) -> Vec<ItemInfo> {
        match self {
            Self::Filter(predicate) => items
                .iter()
                .filter(|info| predicate(host, info))
                .cloned()
                .collect(),
            Self::Sorter(comparator) => {
                let mut ordered = items.to_vec();
                ordered.sort_by(|a, b| comparator(host, a, b));
                ordered
            }
            Self::Composite(children) => {
                let mut ordered: Vec<ItemInfo> = items
                    .iter()
                    .filter(|info| self.can_contain(host, info))
                    .cloned()
                    .collect();
                for child in children {
                    if matches!(child, Self::Filter(_)) {
                        continue;
                    }
                    ordered = child.order(host, &ordered);
                }
                ordered
            }
        }
    }
}

impl fmt::Debug for FilterSorter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(_) => f.write_str("Filter(..)"),
            Self::Sorter(_) => f.write_str("Sorter(..)"),
            Self::Composite(children) => f.debug_tuple("Composite").field(children).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use crate::model::fixtures::TestInventory;
    use crate::model::ItemInfo;

    use super::FilterSorter;

    fn infos(inventory: &mut TestInventory, specs: &[(&str, &str, u32)]) -> Vec<ItemInfo> {
        specs
            .iter()
            .map(|(id, kind, amount)| ItemInfo::loose(inventory.add(id, kind, *amount, None)))
            .collect()
    }

    #[test]
    fn filter_narrows_and_never_reorders() {
        let mut inventory = TestInventory::new();
        let items = infos(
            &mut inventory,
            &[("i1", "sword", 1), ("i2", "potion", 3), ("i3", "sword", 1)],
        );

        let swords_only = FilterSorter::filter(|host, info| {
            host.kind_of(&info.item).is_some_and(|kind| kind.as_str() == "sword")
        });

        assert!(swords_only.can_contain(&inventory, &items[0]));
        assert!(!swords_only.can_contain(&inventory, &items[1]));

        let ordered = swords_only.order(&inventory, &items);
        assert_eq!(ordered, vec![items[0].clone(), items[2].clone()]);
    }

    #[test]
    fn sorter_always_admits() {
        let mut inventory = TestInventory::new();
        let items = infos(&mut inventory, &[("i1", "potion", 3)]);

        let by_id = FilterSorter::sorter(|_, a, b| a.item.cmp(&b.item));
        assert!(by_id.can_contain(&inventory, &items[0]));
    }

    #[test]
    fn sorter_orders_a_snapshot() {
        let mut inventory = TestInventory::new();
        let items = infos(
            &mut inventory,
            &[("i3", "sword", 1), ("i1", "potion", 3), ("i2", "sword", 1)],
        );

        let by_id = FilterSorter::sorter(|_, a, b| a.item.cmp(&b.item));
        let ordered = by_id.order(&inventory, &items);

        assert_eq!(
            ordered,
            vec![items[1].clone(), items[2].clone(), items[0].clone()]
        );
        // The source snapshot is untouched.
        assert_eq!(items[0].item.as_str(), "i3");
    }

    #[test]
    fn composite_filters_then_sorts_with_last_sorter_winning() {
        let mut inventory = TestInventory::new();
        let items = infos(
            &mut inventory,
            &[
                ("i4", "sword", 2),
                ("i2", "potion", 9),
                ("i3", "sword", 5),
                ("i1", "sword", 5),
            ],
        );

        let chain = FilterSorter::composite(vec![
            FilterSorter::filter(|host, info| {
                host.kind_of(&info.item).is_some_and(|kind| kind.as_str() == "sword")
            }),
            FilterSorter::sorter(|_, a, b| a.item.cmp(&b.item)),
            FilterSorter::sorter(|host, a, b| {
                let amount = |info: &crate::model::ItemInfo| {
                    host.snapshot_of(&info.item).map_or(0, |snapshot| snapshot.amount)
                };
                amount(a).cmp(&amount(b))
            }),
        ]);

        let ordered = chain.order(&inventory, &items);
        let ids: Vec<&str> = ordered.iter().map(|info| info.item.as_str()).collect();

        // Potion filtered out; amount sort wins, id sort breaks the 5/5 tie.
        assert_eq!(ids, vec!["i4", "i1", "i3"]);
    }

    #[test]
    fn composite_rejects_when_any_filter_rejects() {
        let mut inventory = TestInventory::new();
        let items = infos(&mut inventory, &[("i1", "sword", 1)]);

        let chain = FilterSorter::composite(vec![
            FilterSorter::filter(|_, _| true),
            FilterSorter::filter(|_, _| false),
        ]);
        assert!(!chain.can_contain(&inventory, &items[0]));
    }
}
