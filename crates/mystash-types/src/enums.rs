//! Closed vocabularies stored as strings.
//!
//! Each enum serializes to the exact string the upstream services persist
//! and parses back with [`FromStr`](std::str::FromStr), so filters taken
//! from query strings are validated before they reach a store.

use serde::{Deserialize, Serialize};

/// Unknown value for a closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Comma-separated list of accepted values, for error messages.
            pub fn accepted() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ParseError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// Savings plan flavour.
    SaveType ("save type") {
        Regular => "regular",
        Salary => "salary",
        Target => "target",
        Flex => "flex",
    }
}

string_enum! {
    /// Whether early withdrawal from a stash is penalised.
    StrictStatus ("strict status") {
        Strict => "strict",
        Flex => "flex",
    }
}

string_enum! {
    /// Cadence of automatic stash top-ups.
    AutoType ("automation type") {
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
    }
}

string_enum! {
    /// Ledger direction.
    Entry ("entry") {
        Credit => "credit",
        Debit => "debit",
    }
}

string_enum! {
    TransactionStatus ("status") {
        Success => "success",
        Pending => "pending",
        Failed => "failed",
    }
}

string_enum! {
    /// Where a transaction's funds came from.
    SourceType ("source type") {
        Card => "Card",
        Wallet => "Wallet",
        Bank => "Bank",
        Transfer => "Transfer",
        Payment => "Payment",
        External => "External",
        MyStash => "MyStash",
    }
}

string_enum! {
    /// Currencies accepted by the transaction filter.
    Currency ("currency") {
        Usd => "USD",
        Ngn => "NGN",
        Eur => "EUR",
        Gbp => "GBP",
    }
}

string_enum! {
    TransferStatus ("transfer status") {
        Pending => "pending",
        Processing => "processing",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

string_enum! {
    /// Payment rail an account is registered on.
    AccountType ("account type") {
        Bank => "bank",
        MobileMoney => "mobile_money",
        Crypto => "crypto",
        Card => "card",
    }
}

string_enum! {
    BeneficiaryType ("beneficiary type") {
        Individual => "individual",
        Business => "business",
    }
}

string_enum! {
    /// Lifecycle position of a stash, derived from its window at read time.
    PlanStatus ("plan status") {
        Pending => "pending",
        Active => "active",
        Matured => "matured",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!("salary".parse::<SaveType>(), Ok(SaveType::Salary));
        assert_eq!("MyStash".parse::<SourceType>(), Ok(SourceType::MyStash));
        assert_eq!("mobile_money".parse::<AccountType>(), Ok(AccountType::MobileMoney));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "Salary".parse::<SaveType>().expect_err("capitalised");
        assert_eq!(err.kind, "save type");
        assert_eq!(err.to_string(), "invalid save type: Salary");
    }

    #[test]
    fn test_serde_uses_stored_strings() {
        let json = serde_json::to_string(&Currency::Ngn).expect("serialize");
        assert_eq!(json, "\"NGN\"");
        let parsed: TransferStatus = serde_json::from_str("\"cancelled\"").expect("parse");
        assert_eq!(parsed, TransferStatus::Cancelled);
    }

    #[test]
    fn test_accepted_lists_all() {
        assert_eq!(SaveType::accepted(), "regular, salary, target, flex");
    }
}
