// ============================================================================
// frp-signals - Equality Functions
// Comparators for `drop_repeats_by`
// ============================================================================
//
// `drop_repeats` uses PartialEq, which already compares composite values
// structurally. These helpers cover the cases where that is not what you
// want: floats carrying NaN, or values identified by a key.
// ============================================================================

/// Plain `PartialEq` equality.
///
/// # Example
/// ```
/// use frp_signals::reactivity::equality::equals;
///
/// assert!(equals(&[1, 2], &[1, 2]));
/// assert!(!equals(&"a", &"b"));
/// ```
pub fn equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

/// f64 equality that treats NaN as equal to NaN.
///
/// With plain `PartialEq` a stream of NaNs is never a repeat, since
/// `NaN != NaN`.
///
/// # Example
/// ```
/// use frp_signals::reactivity::equality::safe_equals_f64;
///
/// assert!(safe_equals_f64(&f64::NAN, &f64::NAN));
/// assert!(!safe_equals_f64(&f64::NAN, &0.0));
/// assert!(safe_equals_f64(&1.5, &1.5));
/// ```
pub fn safe_equals_f64(a: &f64, b: &f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    a == b
}

/// f32 equality that treats NaN as equal to NaN.
pub fn safe_equals_f32(a: &f32, b: &f32) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    a == b
}

/// Never equal: `drop_repeats_by(never_equals, s)` forwards every update.
pub fn never_equals<T>(_a: &T, _b: &T) -> bool {
    false
}

/// Compare values by a derived key.
///
/// # Example
/// ```
/// use frp_signals::reactivity::equality::by_key;
///
/// struct Reading { sensor: u32, celsius: f64 }
///
/// let same_sensor = by_key(|r: &Reading| r.sensor);
/// assert!(same_sensor(
///     &Reading { sensor: 1, celsius: 20.0 },
///     &Reading { sensor: 1, celsius: 21.5 },
/// ));
/// ```
pub fn by_key<T, K, F>(key: F) -> impl Fn(&T, &T) -> bool
where
    F: Fn(&T) -> K,
    K: PartialEq,
{
    move |a, b| key(a) == key(b)
}
