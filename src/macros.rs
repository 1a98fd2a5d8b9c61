/// Asserts that two floating-point expressions are equal up to an epsilon,
/// `0.0005` unless one is given.
///
/// ```rust
/// use columbite::assert_nearly_equals;
///
/// # fn main() {
/// assert_nearly_equals!(0.1f32 + 0.2f32, 0.3f32);
/// # }
/// ```
#[macro_export]
macro_rules! assert_nearly_equals {
    ($left:expr, $right:expr) => {
        assert_nearly_equals!($left, $right, 0.0005)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {{
        match (&$left, &$right, &$epsilon) {
            (left_val, right_val, epsilon_val) => {
                if (*left_val - *right_val).abs() > *epsilon_val {
                    panic!(
                        "assertion failed: `(left ~= right)`\n  left: `{:?}`,\n right: `{:?}`",
                        &*left_val, &*right_val
                    )
                }
            }
        }
    }};
}

#[cfg(test)]
mod test {
    #[test]
    fn test_assert_nearly_equals() {
        assert_nearly_equals!(1.0f32, 1.0002f32);
    }

    #[test]
    #[should_panic]
    fn test_assert_nearly_equals_panics() {
        assert_nearly_equals!(1.0f32, 1.1f32);
    }
}
