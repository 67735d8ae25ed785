//! Property tests for the listener tree: pruning keeps the trie
//! proportional to live registrations, and notification scope is exactly
//! the prefix relation between paths.

use std::cell::Cell;
use std::rc::Rc;

use pathtree_store::{ListenerTree, Path, Segment, Stamp};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        prop::sample::select(vec!["a", "b", "c"]).prop_map(Segment::from),
        (0usize..3).prop_map(Segment::from),
    ]
}

fn path_strategy() -> impl Strategy<Value = Path> {
    prop::collection::vec(segment(), 0..4).prop_map(Path::from_iter)
}

fn counting(tree: &mut ListenerTree, path: &Path) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    tree.add(path, move |_| c.set(c.get() + 1));
    count
}

proptest! {
    #[test]
    fn removing_every_registration_empties_the_tree(
        paths in prop::collection::vec(path_strategy(), 0..12),
    ) {
        let mut tree = ListenerTree::new();
        let ids: Vec<_> = paths.iter().map(|p| tree.add(p, |_| {})).collect();

        for (path, id) in paths.iter().zip(ids) {
            prop_assert!(tree.remove(path, id));
        }

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.node_count(), 0);
        prop_assert_eq!(tree.listener_count(), 0);
    }

    #[test]
    fn notification_scope_is_exactly_the_prefix_relation(
        registered in prop::collection::vec(path_strategy(), 1..8),
        target in path_strategy(),
    ) {
        let mut tree = ListenerTree::new();
        let counters: Vec<_> = registered
            .iter()
            .map(|path| counting(&mut tree, path))
            .collect();

        tree.notify(&target, Stamp::now(0));

        for (path, count) in registered.iter().zip(&counters) {
            let related = path.starts_with(&target) || target.starts_with(path);
            prop_assert_eq!(
                count.get(),
                usize::from(related),
                "listener at `{}`, notify at `{}`",
                path,
                target
            );
        }
    }

    #[test]
    fn partial_removal_prunes_without_disturbing_survivors(
        entries in prop::collection::vec((path_strategy(), any::<bool>()), 1..10),
    ) {
        let mut tree = ListenerTree::new();
        let registrations: Vec<_> = entries
            .iter()
            .map(|(path, keep)| {
                let count = Rc::new(Cell::new(0));
                let c = Rc::clone(&count);
                let id = tree.add(path, move |_| c.set(c.get() + 1));
                (path.clone(), *keep, id, count)
            })
            .collect();

        for (path, keep, id, _) in &registrations {
            if !keep {
                prop_assert!(tree.remove(path, *id));
            }
        }

        // The trie never outgrows the live registrations.
        let live_segments: usize = registrations
            .iter()
            .filter(|(_, keep, _, _)| *keep)
            .map(|(path, ..)| path.len())
            .sum();
        prop_assert!(tree.node_count() <= live_segments);

        // Survivors still hear their exact path; removed registrations
        // are silent even when a path-equal survivor remains.
        for (path, keep, _, count) in &registrations {
            let before = count.get();
            tree.notify(path, Stamp::now(0));
            if *keep {
                prop_assert_eq!(count.get(), before + 1);
            } else {
                prop_assert_eq!(count.get(), before);
            }
        }
    }
}
