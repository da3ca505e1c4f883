macro_rules! for_each_function_signature {
    ($mac:ident) => {
        $mac!(0);
        $mac!(1 A1);
        $mac!(2 A1 A2);
        $mac!(3 A1 A2 A3);
        $mac!(4 A1 A2 A3 A4);
        $mac!(5 A1 A2 A3 A4 A5);
        $mac!(6 A1 A2 A3 A4 A5 A6);
        $mac!(7 A1 A2 A3 A4 A5 A6 A7);
        $mac!(8 A1 A2 A3 A4 A5 A6 A7 A8);
        $mac!(9 A1 A2 A3 A4 A5 A6 A7 A8 A9);
        $mac!(10 A1 A2 A3 A4 A5 A6 A7 A8 A9 A10);
        $mac!(11 A1 A2 A3 A4 A5 A6 A7 A8 A9 A10 A11);
        $mac!(12 A1 A2 A3 A4 A5 A6 A7 A8 A9 A10 A11 A12);
        $mac!(13 A1 A2 A3 A4 A5 A6 A7 A8 A9 A10 A11 A12 A13);
        $mac!(14 A1 A2 A3 A4 A5 A6 A7 A8 A9 A10 A11 A12 A13 A14);
        $mac!(15 A1 A2 A3 A4 A5 A6 A7 A8 A9 A10 A11 A12 A13 A14 A15);
        $mac!(16 A1 A2 A3 A4 A5 A6 A7 A8 A9 A10 A11 A12 A13 A14 A15 A16);
    };
}

/// An argument tuple that can be passed to a C function returning `Res`.
///
/// `FnPtr` is the matching `unsafe extern "C" fn` pointer type, so
/// `(c_int, *const c_char)` pairs with `unsafe extern "C" fn(c_int, *const c_char) -> Res`.
pub trait CallArgs<Res>: Sized {
    type FnPtr: Copy;

    /// Calls `func` with the tuple spread out as positional arguments.
    ///
    /// # Safety
    ///
    /// `func` must really have the signature described by `FnPtr`.
    unsafe fn call_with(self, func: Self::FnPtr) -> Res;
}

macro_rules! impl_call_args {
    ($num:tt $($args:ident)*) => {
        #[allow(non_snake_case)]
        impl<$($args,)* Res> CallArgs<Res> for ($($args,)*) {
            type FnPtr = unsafe extern "C" fn($($args),*) -> Res;

            unsafe fn call_with(self, func: Self::FnPtr) -> Res {
                let ($($args,)*) = self;
                func($($args),*)
            }
        }
    };
}

for_each_function_signature!(impl_call_args);

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::raw::c_int;

    extern "C" fn negate(x: c_int) -> c_int {
        -x
    }

    extern "C" fn sum3(a: c_int, b: c_int, c: c_int) -> c_int {
        a + b + c
    }

    extern "C" fn answer() -> c_int {
        42
    }

    #[test]
    fn spreads_tuples_into_arguments() {
        unsafe {
            assert_eq!(
                CallArgs::<c_int>::call_with((), answer as unsafe extern "C" fn() -> c_int),
                42
            );
            assert_eq!(
                CallArgs::<c_int>::call_with((5,), negate as unsafe extern "C" fn(c_int) -> c_int),
                -5
            );
            assert_eq!(
                CallArgs::<c_int>::call_with(
                    (1, 2, 3),
                    sum3 as unsafe extern "C" fn(c_int, c_int, c_int) -> c_int
                ),
                6
            );
        }
    }
}
