//! Test assertion macros.

/// Assert that a result is Ok.
///
/// # Example
///
/// ```ignore
/// let result = transformer.transform(&class, "SongData");
/// assert_ok!(result);
/// assert_ok!(result, "SongData should transform");
/// ```
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match &$expr {
            Ok(_) => (),
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match &$expr {
            Ok(_) => (),
            Err(e) => panic!("assertion failed: {}: expected Ok, got Err({:?})", format_args!($($arg)+), e),
        }
    };
}

/// Assert that a result is Err.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match &$expr {
            Err(_) => (),
            Ok(v) => panic!("assertion failed: expected Err, got Ok({:?})", v),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match &$expr {
            Err(_) => (),
            Ok(v) => panic!("assertion failed: {}: expected Err, got Ok({:?})", format_args!($($arg)+), v),
        }
    };
}

/// Assert that an error matches a specific variant.
///
/// # Example
///
/// ```ignore
/// let result = TypeDescriptor::build(&declared, None);
/// assert_err_variant!(result, DataShapeError::MissingElementType { .. });
/// ```
#[macro_export]
macro_rules! assert_err_variant {
    ($expr:expr, $variant:pat) => {
        match &$expr {
            Err($variant) => (),
            Err(e) => panic!(
                "assertion failed: expected {}, got {:?}",
                stringify!($variant),
                e
            ),
            Ok(v) => panic!(
                "assertion failed: expected Err({}), got Ok({:?})",
                stringify!($variant),
                v
            ),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::error::DataShapeError;

    #[test]
    fn test_assert_ok() {
        let result: Result<i32, String> = Ok(42);
        assert_ok!(result);
        assert_ok!(result, "with message");
    }

    #[test]
    fn test_assert_err() {
        let result: Result<i32, String> = Err("error".to_string());
        assert_err!(result);
    }

    #[test]
    fn test_assert_err_variant() {
        let result: Result<(), DataShapeError> =
            Err(DataShapeError::NotTransformable("Helper".into()));
        assert_err_variant!(result, DataShapeError::NotTransformable(_));
    }

    #[test]
    #[should_panic(expected = "expected Err")]
    fn test_assert_err_variant_on_ok() {
        let result: Result<(), DataShapeError> = Ok(());
        assert_err_variant!(result, DataShapeError::NotTransformable(_));
    }
}
