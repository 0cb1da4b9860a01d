#![allow(missing_docs)]
#![cfg(not(feature = "loom"))]

use loop_tree::range::Range;

#[test]
fn display_1d() {
    assert_eq!(Range::new(0, 5).to_string(), "[0,5)");
    assert_eq!(Range::new(1, 2).to_string(), "[1,2)");
}

#[test]
fn display_2d() {
    assert_eq!(Range::new([0, 2], [5, 7]).to_string(), "[[0,2],[5,7])");
    assert_eq!(Range::new([1, 4], [2, 5]).to_string(), "[[1,4],[2,5])");
}

#[test]
fn grow_and_shrink() {
    let limit = Range::new(0, 5);
    let a = Range::new(1, 2);

    assert_eq!(a.grow(&limit, 1).to_string(), "[0,3)");
    assert_eq!(a.grow(&limit, 1).grow(&limit, 1).to_string(), "[0,4)");
    assert_eq!(
        a.grow(&limit, 1).grow(&limit, 1).grow(&limit, 1).to_string(),
        "[0,5)"
    );
    assert_eq!(
        a.grow(&limit, 1)
            .grow(&limit, 1)
            .grow(&limit, 1)
            .grow(&limit, 1)
            .to_string(),
        "[0,5)"
    );

    assert_eq!(a.grow(&limit, 2).to_string(), "[0,4)");
    assert_eq!(a.grow(&limit, 3).to_string(), "[0,5)");
    assert_eq!(a.grow(&limit, 4).to_string(), "[0,5)");

    assert_eq!(a.shrink(1).to_string(), "[2,2)");
    assert_eq!(limit.shrink(1).to_string(), "[1,4)");
    assert_eq!(limit.shrink(1).shrink(1).to_string(), "[2,3)");
    assert_eq!(limit.shrink(1).shrink(1).shrink(1).to_string(), "[3,3)");

    assert_eq!(limit.shrink(2).to_string(), "[2,3)");
    assert_eq!(limit.shrink(3).to_string(), "[3,3)");
}

#[test]
fn grow_and_shrink_2d() {
    let limit = Range::new([0, 2], [5, 7]);
    let a = Range::new([1, 4], [2, 5]);

    assert_eq!(a.grow(&limit, 1).to_string(), "[[0,3],[3,6])");
    assert_eq!(a.grow(&limit, 1).grow(&limit, 1).to_string(), "[[0,2],[4,7])");
    assert_eq!(
        a.grow(&limit, 1).grow(&limit, 1).grow(&limit, 1).to_string(),
        "[[0,2],[5,7])"
    );
    assert_eq!(
        a.grow(&limit, 1)
            .grow(&limit, 1)
            .grow(&limit, 1)
            .grow(&limit, 1)
            .to_string(),
        "[[0,2],[5,7])"
    );

    assert_eq!(a.grow(&limit, 2).to_string(), "[[0,2],[4,7])");
    assert_eq!(a.grow(&limit, 3).to_string(), "[[0,2],[5,7])");
    assert_eq!(a.grow(&limit, 4).to_string(), "[[0,2],[5,7])");

    assert_eq!(a.shrink(1).to_string(), "[[2,5],[2,5])");

    assert_eq!(limit.shrink(1).to_string(), "[[1,3],[4,6])");
    assert_eq!(limit.shrink(1).shrink(1).to_string(), "[[2,4],[3,5])");
    assert_eq!(
        limit.shrink(1).shrink(1).shrink(1).to_string(),
        "[[3,5],[3,5])"
    );
    assert_eq!(
        limit.shrink(1).shrink(1).shrink(1).shrink(1).to_string(),
        "[[4,6],[4,6])"
    );

    assert_eq!(limit.shrink(2).to_string(), "[[2,4],[3,5])");
    assert_eq!(limit.shrink(3).to_string(), "[[3,5],[3,5])");
    assert_eq!(limit.shrink(4).to_string(), "[[4,6],[4,6])");
}

#[test]
fn grow_in_steps_matches_repeated_grow() {
    let limit = Range::new([0, 0], [9, 9]);
    let seed = Range::new([3, 4], [5, 5]);
    for steps in 1..6u32 {
        let mut repeated = seed;
        for _ in 0..steps {
            repeated = repeated.grow(&limit, 1);
        }
        assert_eq!(seed.grow(&limit, steps), repeated, "steps {steps}");
    }
}

#[test]
fn shrink_in_steps_matches_repeated_shrink() {
    let seed = Range::new([0, 2], [9, 7]);
    for steps in 1..6u32 {
        let mut repeated = seed;
        for _ in 0..steps {
            repeated = repeated.shrink(1);
        }
        assert_eq!(seed.shrink(steps), repeated, "steps {steps}");
    }
}

#[test]
fn split_partitions_the_range() {
    let range = Range::new(0, 5);
    let (left, right) = range.split();
    assert_eq!(left.to_string(), "[0,2)");
    assert_eq!(right.to_string(), "[2,5)");
    assert_eq!(left.volume() + right.volume(), range.volume());
    assert!(left.intersect(&right).is_empty());
}

#[test]
fn split_prefers_the_widest_then_lowest_dimension() {
    // Second dimension strictly wider.
    let (left, right) = Range::new([0, 0], [4, 8]).split();
    assert_eq!(left.to_string(), "[[0,0],[4,4])");
    assert_eq!(right.to_string(), "[[0,4],[4,8])");

    // Width tie breaks toward the first dimension.
    let (left, right) = Range::new([0, 0], [4, 4]).split();
    assert_eq!(left.to_string(), "[[0,0],[2,4])");
    assert_eq!(right.to_string(), "[[2,0],[4,4])");
}

#[test]
fn intersect_and_covers() {
    let a = Range::new([0, 0], [6, 6]);
    let b = Range::new([4, 2], [9, 4]);
    let meet = a.intersect(&b);
    assert_eq!(meet.to_string(), "[[4,2],[6,4])");
    assert!(a.covers(&meet));
    assert!(b.covers(&meet));
    assert!(!a.covers(&b));

    let disjoint = Range::new([7, 0], [9, 6]);
    assert!(a.intersect(&disjoint).is_empty());
    // Everything covers the empty range.
    assert!(disjoint.covers(&a.intersect(&disjoint)));
}

#[test]
fn contains_points() {
    let range = Range::new([0, 2], [5, 7]);
    assert!(range.contains(&[0, 2]));
    assert!(range.contains(&[4, 6]));
    assert!(!range.contains(&[5, 6]));
    assert!(!range.contains(&[4, 7]));
    assert!(!range.contains(&[-1, 2]));
}

#[test]
fn empty_ranges() {
    assert!(Range::new(3, 3).is_empty());
    assert_eq!(Range::new(3, 3).volume(), 0);
    // Inverted endpoints normalize to empty.
    assert!(Range::new(5, 3).is_empty());
    assert!(Range::new([0, 5], [4, 3]).is_empty());
    assert_eq!(Range::new(0, 5).volume(), 5);
    assert_eq!(Range::new([0, 0], [4, 8]).volume(), 32);
}

#[test]
fn for_each_is_lexicographic() {
    let mut seen = Vec::new();
    Range::new([0, 0], [2, 3]).for_each(|point| seen.push(point));
    assert_eq!(
        seen,
        vec![[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]]
    );

    let mut seen = Vec::new();
    Range::new(2, 5).for_each(|point| seen.push(point));
    assert_eq!(seen, vec![2, 3, 4]);

    let mut count = 0;
    Range::new(4, 4).for_each(|_| count += 1);
    assert_eq!(count, 0);
}
