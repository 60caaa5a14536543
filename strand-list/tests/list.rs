use strand_list::{BoxedListStorage, ConstPos, Full, List, OwnedList, Pos, SlabListStorage};

type Slab = SlabListStorage<i64>;
type SlabList = List<i64, Slab, usize>;
type Boxed = BoxedListStorage<i64>;
type BoxedList = List<i64, Boxed>;

fn contents<S>(list: &List<i64, S, usize>, storage: &S) -> Vec<i64>
where
    S: strand_list::Storage<strand_list::ListNode<i64, usize>, Key = usize>,
{
    list.iter(storage).copied().collect()
}

fn nth(list: &SlabList, storage: &Slab, n: usize) -> Pos<usize> {
    let mut pos = list.begin(storage);
    for _ in 0..n {
        pos = list.next(storage, pos);
    }
    pos
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn counted_construction() {
    let mut storage = Slab::new();
    let list = SlabList::with_value(&mut storage, 3, &7);

    assert_eq!(list.len(), 3);
    assert_eq!(contents(&list, &storage), [7, 7, 7]);
}

#[test]
fn copy_is_deep_and_independent() {
    let mut storage = Slab::new();
    let original = SlabList::from_iter_in(&mut storage, [1, 2, 3]);
    let copy = original.clone_in(&mut storage);

    *copy.back_mut(&mut storage).unwrap() = 30;

    assert_eq!(contents(&original, &storage), [1, 2, 3]);
    assert_eq!(contents(&copy, &storage), [1, 2, 30]);
}

#[test]
fn move_leaves_source_empty_and_usable() {
    let mut storage = Slab::new();
    let mut source = SlabList::from_iter_in(&mut storage, [1, 2, 3]);

    let moved = source.take();
    assert!(source.is_empty());
    assert_eq!(moved.len(), 3);

    source.push_back(&mut storage, 4);
    assert_eq!(contents(&source, &storage), [4]);
}

// =============================================================================
// Insert / erase
// =============================================================================

#[test]
fn insert_before_begin_and_end() {
    let mut storage = Slab::new();
    let mut list = SlabList::from_iter_in(&mut storage, [2]);

    let begin = list.begin(&storage);
    let first = list.insert(&mut storage, begin, 1);
    let last = list.insert(&mut storage, list.end(), 3);

    assert_eq!(list.begin(&storage), first);
    assert_eq!(list.back_pos(&storage), last);
    assert_eq!(contents(&list, &storage), [1, 2, 3]);
}

#[test]
fn erase_keeps_other_positions_valid() {
    let mut storage = Slab::new();
    let mut list = SlabList::from_iter_in(&mut storage, 0..5);
    let keep: Vec<Pos<usize>> = list.positions(&storage).collect();

    list.erase(&mut storage, keep[2]);

    for (pos, want) in [(keep[0], 0), (keep[1], 1), (keep[3], 3), (keep[4], 4)] {
        assert_eq!(list.get(&storage, pos), Some(&want));
    }
}

#[test]
fn erase_begin_begin_is_noop() {
    let mut storage = Slab::new();
    let mut list = SlabList::from_iter_in(&mut storage, [1, 2, 3]);

    let begin = list.begin(&storage);
    let ret = list.erase_range(&mut storage, begin, begin);

    assert_eq!(ret, begin);
    assert_eq!(list.len(), 3);
}

#[test]
fn erase_everything_by_range() {
    let mut storage = Slab::new();
    let mut list = SlabList::from_iter_in(&mut storage, [1, 2, 3]);

    let begin = list.begin(&storage);
    let ret = list.erase_range(&mut storage, begin, list.end());

    assert!(ret.is_end());
    assert!(list.is_empty());
    assert!(storage.is_empty());
}

#[test]
fn const_positions_reach_mutable_access_only_by_cast() {
    let mut storage = Slab::new();
    let list = SlabList::from_iter_in(&mut storage, [1]);

    let cpos: ConstPos<usize> = list.cbegin(&storage);
    assert_eq!(list.get(&storage, cpos), Some(&1));

    *list.get_mut(&mut storage, cpos.cast_mut()).unwrap() = 2;
    assert_eq!(list.get(&storage, cpos), Some(&2));
}

// =============================================================================
// Splice
// =============================================================================

#[test]
fn splice_whole_list_before_second_element() {
    let mut storage = Slab::new();
    let mut list = SlabList::from_iter_in(&mut storage, [1, 2, 3, 4]);
    let mut other = SlabList::from_iter_in(&mut storage, [10, 20, 30]);
    let ten = other.begin(&storage);

    let pos = nth(&list, &storage, 1);
    list.splice(&mut storage, pos, &mut other);

    assert_eq!(contents(&list, &storage), [1, 10, 20, 30, 2, 3, 4]);
    assert_eq!(list.len(), 7);
    assert!(other.is_empty());
    assert_eq!(list.get(&storage, ten), Some(&10));
}

#[test]
fn splice_range_moves_middle_run() {
    let mut storage = Slab::new();
    let mut list = SlabList::from_iter_in(&mut storage, [1, 2, 3, 4]);
    let mut other = SlabList::from_iter_in(&mut storage, [10, 20, 30]);

    let first = nth(&other, &storage, 1);
    let pos = list.end();
    let last = other.end();
    list.splice_range(&mut storage, pos, &mut other, first, last);

    assert_eq!(contents(&list, &storage), [1, 2, 3, 4, 20, 30]);
    assert_eq!(contents(&other, &storage), [10]);
    assert_eq!((list.len(), other.len()), (6, 1));
}

#[test]
fn splice_one_single_element_lists() {
    let mut storage = Slab::new();
    let mut list = SlabList::from_iter_in(&mut storage, [1]);
    let mut other = SlabList::from_iter_in(&mut storage, [2]);

    let it = other.begin(&storage);
    let pos = list.begin(&storage);
    list.splice_one(&mut storage, pos, &mut other, it);

    assert_eq!(contents(&list, &storage), [2, 1]);
    assert!(other.is_empty());
    assert!(other.begin(&storage).is_end());
}

#[test]
fn splice_does_not_touch_storage() {
    let mut storage = Slab::new();
    let mut list = SlabList::from_iter_in(&mut storage, 0..100);
    let mut other = SlabList::from_iter_in(&mut storage, 100..200);
    let before = storage.len();

    let pos = nth(&list, &storage, 50);
    list.splice(&mut storage, pos, &mut other);

    assert_eq!(storage.len(), before);
    assert_eq!(list.len(), 200);
}

// =============================================================================
// Remove / reverse / compare
// =============================================================================

#[test]
fn remove_if_without_match_changes_nothing() {
    let mut storage = Slab::new();
    let mut list = SlabList::with_value(&mut storage, 5, &10);

    let removed = list.remove_if(&mut storage, |&v| v > -10 && v < 10);

    assert_eq!(removed, 0);
    assert_eq!(list.len(), 5);
}

#[test]
fn remove_is_idempotent() {
    let mut storage = Slab::new();
    let mut list = SlabList::from_iter_in(&mut storage, [4, 1, 4, 4, 2]);

    assert_eq!(list.remove(&mut storage, &4), 3);
    let once = contents(&list, &storage);
    assert_eq!(list.remove(&mut storage, &4), 0);

    assert_eq!(contents(&list, &storage), once);
    assert_eq!(once, [1, 2]);
}

#[test]
fn reverse_twice_is_identity() {
    let mut storage = Slab::new();
    let mut list = SlabList::from_iter_in(&mut storage, [1, 2, 3, 4, 5]);

    list.reverse(&mut storage);
    assert_eq!(contents(&list, &storage), [5, 4, 3, 2, 1]);
    list.reverse(&mut storage);
    assert_eq!(contents(&list, &storage), [1, 2, 3, 4, 5]);
}

#[test]
fn comparison_laws() {
    let a: OwnedList<i64> = [1, 2, 3].into_iter().collect();
    let b: OwnedList<i64> = [1, 2, 4].into_iter().collect();
    let prefix: OwnedList<i64> = [1, 2].into_iter().collect();

    assert!(a < b);
    assert!(!(b < a));
    assert!(prefix < a);
    assert!(a != b);
    assert!(a == a.clone());
    assert!(a <= a.clone() && a >= a.clone());
}

// =============================================================================
// Bounded storage
// =============================================================================

#[test]
fn bounded_insert_is_all_or_nothing() {
    let mut storage = Boxed::with_capacity(8);
    let mut list = BoxedList::try_from_iter_in(&mut storage, [1, 2, 3, 4]).unwrap();

    let end = list.end();
    let err = list.try_insert_n(&mut storage, end, 10, &0).unwrap_err();

    assert_eq!(err, Full(0));
    assert_eq!(list.len(), 4);
    assert_eq!(storage.len(), 4);
}

#[test]
fn bounded_assign_keeps_old_contents_on_failure() {
    let mut storage = Boxed::with_capacity(4);
    let mut list = BoxedList::try_from_iter_in(&mut storage, [1, 2, 3]).unwrap();

    assert!(list.try_assign(&mut storage, [9, 9]).is_err());
    assert_eq!(list.iter(&storage).copied().collect::<Vec<_>>(), [1, 2, 3]);

    list.clear(&mut storage);
    list.try_assign(&mut storage, [9, 9]).unwrap();
    assert_eq!(list.iter(&storage).copied().collect::<Vec<_>>(), [9, 9]);
}

#[test]
fn full_error_reports_and_returns_value() {
    let mut storage = Boxed::with_capacity(1);
    let mut list = BoxedList::new();
    list.try_push_back(&mut storage, 1).unwrap();

    let err = list.try_push_back(&mut storage, 2).unwrap_err();

    assert_eq!(err.to_string(), "storage is full");
    assert_eq!(err.into_inner(), 2);
}
