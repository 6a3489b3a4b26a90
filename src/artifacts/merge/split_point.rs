//! Ancestry engine
//!
//! Ancestry queries over the commit DAG. A commit may have up to two parents, so
//! every traversal follows all parent edges, not only the first one.
//!
//! ## Algorithm Overview
//!
//! [`SplitPointFinder::reachable_set`] runs a breadth-first search from a commit
//! and records, for each reachable commit, its distance in parent edges. The
//! start commit has distance 0; a commit is never enqueued twice, so the first
//! discovered distance is the shortest one.
//!
//! The split point of two commits A and B is the common reachable commit with
//! the smallest `distance-from-A + distance-from-B`. Ties prefer the smaller
//! distance from A and then the smaller digest, which makes the result fully
//! deterministic.
//!
//! ## Symmetry
//!
//! `split_point(A, B) == split_point(B, A)` holds whenever the minimal sum is
//! reached by a single commit or by commits at equal distances from A. In a
//! criss-cross history two candidates may share the minimal sum with mirrored
//! distances; the tie-break on the distance from A then picks the candidate
//! closer to whichever commit was passed first.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let finder = SplitPointFinder::new(|oid| {
//!     Ok(database.load_commit(oid)?.parents().to_vec())
//! });
//!
//! let base = finder.split_point(&head, &target)?;
//! ```

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GitletError;
use std::collections::{HashMap, VecDeque};

/// Finds ancestors in a commit graph
///
/// The graph is read through a loader function returning the parents of a
/// commit, so the finder works against the object store as well as against an
/// in-memory graph.
pub struct SplitPointFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    parents_loader: ParentsLoaderFn,
}

impl<ParentsLoaderFn> SplitPointFinder<ParentsLoaderFn>
where
    ParentsLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    pub fn new(parents_loader: ParentsLoaderFn) -> Self {
        Self { parents_loader }
    }

    /// Every commit reachable from `start` with its shortest distance in parent edges
    pub fn reachable_set(&self, start: &ObjectId) -> anyhow::Result<HashMap<ObjectId, usize>> {
        let mut distances = HashMap::from([(start.clone(), 0)]);
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            let distance = distances.get(&commit_id).copied().unwrap_or_default();

            for parent_id in (self.parents_loader)(&commit_id)? {
                if !distances.contains_key(&parent_id) {
                    debug_log!("Reached {} at distance {}", parent_id, distance + 1);

                    distances.insert(parent_id.clone(), distance + 1);
                    queue.push_back(parent_id);
                }
            }
        }

        Ok(distances)
    }

    /// Whether `candidate` is `of` itself or one of its ancestors
    pub fn is_ancestor(&self, candidate: &ObjectId, of: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.reachable_set(of)?.contains_key(candidate))
    }

    /// The latest common ancestor of two commits
    ///
    /// Fails with `NoCommonAncestor` when the histories are disjoint.
    pub fn split_point(&self, source: &ObjectId, target: &ObjectId) -> anyhow::Result<ObjectId> {
        if source == target {
            return Ok(source.clone());
        }

        let from_source = self.reachable_set(source)?;
        let from_target = self.reachable_set(target)?;

        let split_point = from_source
            .iter()
            .filter_map(|(oid, source_distance)| {
                from_target
                    .get(oid)
                    .map(|target_distance| (source_distance + target_distance, *source_distance, oid))
            })
            .min()
            .map(|(_, _, oid)| oid.clone());

        debug_log!(
            "Split point of {} and {}: {:?}",
            source,
            target,
            split_point
        );

        split_point
            .ok_or_else(|| GitletError::NoCommonAncestor(source.clone(), target.clone()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    /// In-memory commit graph for testing
    #[derive(Debug, Clone, Default)]
    struct InMemoryCommitStore {
        commits: HashMap<ObjectId, Vec<ObjectId>>,
    }

    impl InMemoryCommitStore {
        fn add_commit(&mut self, commit_id: ObjectId, parents: Vec<ObjectId>) {
            self.commits.insert(commit_id, parents);
        }

        fn get_parents(&self, commit_id: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
            self.commits
                .get(commit_id)
                .cloned()
                .ok_or_else(|| GitletError::ObjectNotFound(commit_id.clone()).into())
        }

        fn finder(
            &self,
        ) -> SplitPointFinder<impl Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>> + '_> {
            SplitPointFinder::new(|oid| self.get_parents(oid))
        }
    }

    fn create_oid(id: &str) -> ObjectId {
        let mut hex_string = id
            .as_bytes()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>();

        while hex_string.len() < 40 {
            hex_string.push('0');
        }
        hex_string.truncate(40);

        ObjectId::try_parse(hex_string).unwrap()
    }

    #[fixture]
    fn linear_history() -> InMemoryCommitStore {
        let mut store = InMemoryCommitStore::default();

        // A <- B <- C <- D
        let a = create_oid("commit_a");
        let b = create_oid("commit_b");
        let c = create_oid("commit_c");
        let d = create_oid("commit_d");

        store.add_commit(a.clone(), vec![]);
        store.add_commit(b.clone(), vec![a]);
        store.add_commit(c.clone(), vec![b]);
        store.add_commit(d, vec![c]);

        store
    }

    #[fixture]
    fn branched_with_merge() -> InMemoryCommitStore {
        let mut store = InMemoryCommitStore::default();

        //     A
        //    / \
        //   B   C
        //   |   |\
        //   |   D E
        //    \ /
        //     F (merge of B and D)
        let a = create_oid("commit_a");
        let b = create_oid("commit_b");
        let c = create_oid("commit_c");
        let d = create_oid("commit_d");
        let e = create_oid("commit_e");
        let f = create_oid("commit_f");

        store.add_commit(a.clone(), vec![]);
        store.add_commit(b.clone(), vec![a.clone()]);
        store.add_commit(c.clone(), vec![a]);
        store.add_commit(d.clone(), vec![c.clone()]);
        store.add_commit(e, vec![c]);
        store.add_commit(f, vec![b, d]);

        store
    }

    #[fixture]
    fn criss_cross_merge() -> InMemoryCommitStore {
        let mut store = InMemoryCommitStore::default();

        //     A
        //    / \
        //   B   C
        //   |\ /|
        //   | X |
        //   |/ \|
        //   D   E
        let a = create_oid("commit_a");
        let b = create_oid("commit_b");
        let c = create_oid("commit_c");
        let d = create_oid("commit_d");
        let e = create_oid("commit_e");

        store.add_commit(a.clone(), vec![]);
        store.add_commit(b.clone(), vec![a.clone()]);
        store.add_commit(c.clone(), vec![a]);
        store.add_commit(d, vec![b.clone(), c.clone()]);
        store.add_commit(e, vec![c, b]);

        store
    }

    #[rstest]
    fn test_reachable_set_distances(linear_history: InMemoryCommitStore) {
        let distances = linear_history
            .finder()
            .reachable_set(&create_oid("commit_d"))
            .unwrap();

        assert_eq!(distances.len(), 4);
        assert_eq!(distances[&create_oid("commit_d")], 0);
        assert_eq!(distances[&create_oid("commit_c")], 1);
        assert_eq!(distances[&create_oid("commit_a")], 3);
    }

    #[rstest]
    fn test_reachable_set_follows_second_parents(branched_with_merge: InMemoryCommitStore) {
        let distances = branched_with_merge
            .finder()
            .reachable_set(&create_oid("commit_f"))
            .unwrap();

        assert_eq!(distances[&create_oid("commit_d")], 1);
        assert_eq!(distances[&create_oid("commit_c")], 2);
        assert_eq!(distances[&create_oid("commit_a")], 2);
        assert!(!distances.contains_key(&create_oid("commit_e")));
    }

    #[rstest]
    fn test_split_point_of_a_commit_with_itself(linear_history: InMemoryCommitStore) {
        let c = create_oid("commit_c");

        assert_eq!(linear_history.finder().split_point(&c, &c).unwrap(), c);
    }

    #[rstest]
    fn test_split_point_in_linear_history(linear_history: InMemoryCommitStore) {
        let b = create_oid("commit_b");
        let d = create_oid("commit_d");
        let finder = linear_history.finder();

        assert_eq!(finder.split_point(&b, &d).unwrap(), b);
        assert_eq!(finder.split_point(&d, &b).unwrap(), b);
        assert!(finder.is_ancestor(&b, &d).unwrap());
        assert!(!finder.is_ancestor(&d, &b).unwrap());
    }

    #[rstest]
    fn test_split_point_through_a_merge_parent(branched_with_merge: InMemoryCommitStore) {
        let c = create_oid("commit_c");
        let e = create_oid("commit_e");
        let f = create_oid("commit_f");
        let finder = branched_with_merge.finder();

        assert_eq!(finder.split_point(&f, &e).unwrap(), c);
        assert_eq!(finder.split_point(&e, &f).unwrap(), c);
    }

    #[rstest]
    fn test_split_point_of_siblings(branched_with_merge: InMemoryCommitStore) {
        let a = create_oid("commit_a");
        let b = create_oid("commit_b");
        let e = create_oid("commit_e");

        assert_eq!(branched_with_merge.finder().split_point(&b, &e).unwrap(), a);
    }

    #[rstest]
    fn test_criss_cross_tie_is_broken_by_digest(criss_cross_merge: InMemoryCommitStore) {
        let b = create_oid("commit_b");
        let c = create_oid("commit_c");
        let d = create_oid("commit_d");
        let e = create_oid("commit_e");
        let finder = criss_cross_merge.finder();

        // B and C are both at distance 1 from D and from E; the digest decides
        let expected = std::cmp::min(b, c);
        assert_eq!(finder.split_point(&d, &e).unwrap(), expected);
        assert_eq!(finder.split_point(&e, &d).unwrap(), expected);
    }

    #[test]
    fn test_disjoint_histories_have_no_common_ancestor() {
        let mut store = InMemoryCommitStore::default();
        let x = create_oid("root_x");
        let y = create_oid("root_y");
        store.add_commit(x.clone(), vec![]);
        store.add_commit(y.clone(), vec![]);

        let error = store.finder().split_point(&x, &y).unwrap_err();

        assert_eq!(
            error.downcast_ref::<GitletError>(),
            Some(&GitletError::NoCommonAncestor(x, y))
        );
    }

    #[test]
    fn test_missing_parent_is_reported() {
        let mut store = InMemoryCommitStore::default();
        let orphan = create_oid("orphan");
        let missing = create_oid("missing");
        store.add_commit(orphan.clone(), vec![missing.clone()]);

        let error = store.finder().reachable_set(&orphan).unwrap_err();

        assert_eq!(
            error.downcast_ref::<GitletError>(),
            Some(&GitletError::ObjectNotFound(missing))
        );
    }
}
