use rand::Rng;

/// Shortest parent for which an interior cut point is guaranteed.
pub const MIN_PARENT_LEN: usize = 3;

/// One-point crossover on owned gene lists.
///
/// A cut is drawn uniformly from `[1, min(a.len(), b.len()) - 1]` and the
/// tails after it are swapped. The children's lengths are those of `b` and
/// `a` respectively, so the total gene count is preserved.
pub fn one_point<T, R: Rng>(mut a: Vec<T>, mut b: Vec<T>, rng: &mut R) -> (Vec<T>, Vec<T>) {
    let shortest = a.len().min(b.len());
    debug_assert!(
        shortest >= MIN_PARENT_LEN,
        "one-point crossover needs parents of length >= {MIN_PARENT_LEN}, got {} and {}",
        a.len(),
        b.len()
    );
    if shortest < 2 {
        return (a, b);
    }
    let cut = rng.random_range(1..shortest);
    let tail_a = a.split_off(cut);
    let tail_b = b.split_off(cut);
    a.extend(tail_b);
    b.extend(tail_a);
    (a, b)
}
