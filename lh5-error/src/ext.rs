use crate::{ErrString, Lh5Result};

mod private {
    use crate::Lh5Result;

    pub trait Sealed {}

    impl<T> Sealed for Lh5Result<T> {}
}

/// Attach a lazily built message to the error side of a [`Lh5Result`].
pub trait ContextExt<T>: private::Sealed {
    /// Wrap the error, if any, in [`crate::Lh5Error::Context`].
    fn context<M, F>(self, msg: F) -> Lh5Result<T>
    where
        M: Into<ErrString>,
        F: FnOnce() -> M;
}

impl<T> ContextExt<T> for Lh5Result<T> {
    fn context<M, F>(self, msg: F) -> Lh5Result<T>
    where
        M: Into<ErrString>,
        F: FnOnce() -> M,
    {
        self.map_err(|e| e.with_context(msg()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{ContextExt, Lh5Error, Lh5Result, lh5_err};

    #[test]
    fn context_is_lazy_on_success() {
        let ok: Lh5Result<u8> = Ok(1);
        let value = ok
            .context(|| -> String { unreachable!("message built for Ok") })
            .unwrap();
        assert_eq!(value, 1);
    }

    #[test]
    fn context_wraps_error() {
        let err: Lh5Result<()> = Err(lh5_err!(NotFound: "ch1"));
        let err = err.context(|| "reading tier_dsp.lh5").unwrap_err();
        assert!(matches!(err, Lh5Error::Context(..)));
        assert!(err.to_string().starts_with("reading tier_dsp.lh5: ch1 not found"));
    }
}
