//! Function-object capabilities accepted by collections in this crate.
//!
//! Closures implement both traits through blanket impls, so callers can
//! pass `|e: &TableEntry<_, _>| ...` directly or hand in a struct that
//! carries its own state.

/// Invoked once per element for its side effect.
pub trait Processor<T: ?Sized> {
    fn process(&mut self, value: &T);
}

/// Predicate over an element.
pub trait Tester<T: ?Sized> {
    fn test(&self, value: &T) -> bool;
}

impl<T: ?Sized, F> Processor<T> for F
where
    F: FnMut(&T),
{
    #[inline]
    fn process(&mut self, value: &T) {
        self(value)
    }
}

impl<T: ?Sized, F> Tester<T> for F
where
    F: Fn(&T) -> bool,
{
    #[inline]
    fn test(&self, value: &T) -> bool {
        self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sum(i64);
    impl Processor<i64> for Sum {
        fn process(&mut self, value: &i64) {
            self.0 += *value;
        }
    }

    struct Even;
    impl Tester<i64> for Even {
        fn test(&self, value: &i64) -> bool {
            value % 2 == 0
        }
    }

    fn run<P: Processor<i64>>(p: &mut P, xs: &[i64]) {
        for x in xs {
            p.process(x);
        }
    }

    fn count<T: Tester<i64>>(t: &T, xs: &[i64]) -> usize {
        xs.iter().filter(|x| t.test(x)).count()
    }

    #[test]
    fn struct_implementors() {
        let mut s = Sum(0);
        run(&mut s, &[1, 2, 3]);
        assert_eq!(s.0, 6);
        assert_eq!(count(&Even, &[1, 2, 3, 4]), 2);
    }

    #[test]
    fn closures_via_blanket_impls() {
        let mut seen = Vec::new();
        run(&mut |x: &i64| seen.push(*x), &[5, 6]);
        assert_eq!(seen, vec![5, 6]);
        assert_eq!(count(&|x: &i64| *x > 2, &[1, 2, 3, 4]), 2);
    }

    #[test]
    fn unsized_targets() {
        let t = |s: &str| s.starts_with('k');
        assert!(Tester::<str>::test(&t, "key"));
        assert!(!Tester::<str>::test(&t, "value"));
    }
}
