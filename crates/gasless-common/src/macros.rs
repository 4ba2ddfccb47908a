/// Dispatch the same expression over several enum variants sharing a binding.
/// Example
/// ```rust
/// use gasless_common::enum_dispatch;
///
/// pub enum Transaction {
///     Invoke(Invoke),
///     DeployAndInvoke(DeployAndInvoke),
/// }
///
/// impl Transaction {
///    pub fn fee(&self) -> &Fee {
///       enum_dispatch!(self {
///          Self::Invoke(tx) |
///          Self::DeployAndInvoke(tx) => &tx.fee
///       })
///    }
/// }
/// ```
#[macro_export]
macro_rules! enum_dispatch {
    ($self: ident { $($($variant: pat_param)|* => $do: expr),+ }) => {
        match $self {
            $(
                $($variant => $do),+
            ),+
        }
    };
}

#[cfg(test)]
mod tests {
    enum Amount {
        Small(u8),
        Large(u8),
        Empty,
    }

    impl Amount {
        fn value(&self) -> u8 {
            enum_dispatch!(self {
                Self::Small(v) |
                Self::Large(v) => *v,
                Self::Empty => 0
            })
        }
    }

    #[test]
    fn dispatch_shares_arm_between_variants() {
        assert_eq!(Amount::Small(2).value(), 2);
        assert_eq!(Amount::Large(7).value(), 7);
        assert_eq!(Amount::Empty.value(), 0);
    }
}
