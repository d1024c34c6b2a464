//! Scope guards which run a closure when dropped.

/// Runs `func` once the returned guard goes out of scope, including early returns
/// through `?`.
pub fn finally<F>(func: F) -> FinallyGuard<F>
where
    F: FnMut(),
{
    FinallyGuard { func }
}

pub struct FinallyGuard<F>
where
    F: FnMut(),
{
    func: F,
}

impl<F> FinallyGuard<F>
where
    F: FnMut(),
{
    /// Disarms the guard.
    pub fn forget(self) {
        ::std::mem::forget(self);
    }
}

impl<F> Drop for FinallyGuard<F>
where
    F: FnMut(),
{
    fn drop(&mut self) {
        (self.func)()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::errors::*;

    fn upload(bound: &Cell<bool>, fail_at: usize) -> Result<usize> {
        bound.set(true);
        let _unbind = finally(|| bound.set(false));

        for i in 0..6 {
            if i == fail_at {
                return Err(Error::SizeMismatch { expected: 4, actual: 3 });
            }
        }

        Ok(6)
    }

    #[test]
    fn early_returns() {
        let bound = Cell::new(false);
        assert!(upload(&bound, 2).is_err());
        assert!(!bound.get());

        assert_eq!(upload(&bound, 6).unwrap(), 6);
        assert!(!bound.get());
    }

    #[test]
    fn forget() {
        let hits = Cell::new(0);
        {
            let _guard = finally(|| hits.set(hits.get() + 1));
        }
        assert_eq!(hits.get(), 1);

        finally(|| hits.set(hits.get() + 1)).forget();
        assert_eq!(hits.get(), 1);
    }
}
