macro_rules! fail {
    ($kind:ident, $msg:expr) => (
        return Err($crate::error::Error::$kind(($msg).to_string()))
    );
    ($kind:ident, $fmt:expr, $($arg:tt)*) => (
        return Err($crate::error::Error::$kind(format!($fmt, $($arg)*)))
    );
}

macro_rules! ensure {
    ($expr:expr, $kind:ident, $($arg:tt)*) => (
        if !($expr) {
            fail!($kind, $($arg)*);
        }
    );
}

/// Panics if `$expr` is not an `Err` whose message matches regexp `$err`.
#[cfg(test)]
macro_rules! assert_err {
    ($expr:expr, $err:expr) => {
        match &($expr) {
            Ok(_) => {
                panic!("assertion failed: not an error in `{}`", stringify!($expr));
            }
            Err(value) => {
                let re = regex::Regex::new($err).unwrap();
                let msg = value.to_string();
                if !re.is_match(&msg) {
                    panic!(
                        "assertion failed: error message \"{}\" doesn't match \"{}\" in `{}`",
                        msg,
                        re,
                        stringify!($expr)
                    );
                }
            }
        }
    };
}
