use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Whether a member's payment covered a period. The feed encodes this as `1` or `0`.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PaymentFlag {
    #[default]
    Unpaid,
    Paid,
}

impl PaymentFlag {
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentFlag::Paid)
    }
}

impl TryFrom<u8> for PaymentFlag {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PaymentFlag::Unpaid),
            1 => Ok(PaymentFlag::Paid),
            other => bail!("A payment flag must be 0 or 1, got {other}"),
        }
    }
}

impl From<PaymentFlag> for u8 {
    fn from(value: PaymentFlag) -> Self {
        match value {
            PaymentFlag::Unpaid => 0,
            PaymentFlag::Paid => 1,
        }
    }
}

impl From<bool> for PaymentFlag {
    fn from(paid: bool) -> Self {
        if paid {
            PaymentFlag::Paid
        } else {
            PaymentFlag::Unpaid
        }
    }
}

impl FromStr for PaymentFlag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(PaymentFlag::Unpaid),
            "1" => Ok(PaymentFlag::Paid),
            other => bail!("A payment flag must be 0 or 1, got '{other}'"),
        }
    }
}

impl Display for PaymentFlag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// A participant in the shared plan along with one payment flag per period.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Member {
    name: String,
    #[serde(rename = "data")]
    payment_flags: Vec<PaymentFlag>,
}

impl Member {
    pub fn new<S, I, F>(name: S, payment_flags: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = F>,
        F: Into<PaymentFlag>,
    {
        Self {
            name: name.into(),
            payment_flags: payment_flags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payment_flags(&self) -> &[PaymentFlag] {
        &self.payment_flags
    }

    /// The highest period index with a paid flag.
    pub fn last_paid_index(&self) -> Option<usize> {
        self.payment_flags.iter().rposition(PaymentFlag::is_paid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_serde() {
        let flags: Vec<PaymentFlag> = serde_json::from_str("[1, 0, 1]").unwrap();
        assert_eq!(
            flags,
            vec![PaymentFlag::Paid, PaymentFlag::Unpaid, PaymentFlag::Paid]
        );
        assert_eq!(serde_json::to_string(&flags).unwrap(), "[1,0,1]");
    }

    #[test]
    fn test_flag_serde_rejects_other_numbers() {
        assert!(serde_json::from_str::<Vec<PaymentFlag>>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Vec<PaymentFlag>>("[\"1\"]").is_err());
        assert!(serde_json::from_str::<Vec<PaymentFlag>>("[-1]").is_err());
    }

    #[test]
    fn test_flag_from_str() {
        assert_eq!(" 1 ".parse::<PaymentFlag>().unwrap(), PaymentFlag::Paid);
        assert_eq!("0".parse::<PaymentFlag>().unwrap(), PaymentFlag::Unpaid);
        assert!("".parse::<PaymentFlag>().is_err());
        assert!("yes".parse::<PaymentFlag>().is_err());
    }

    #[test]
    fn test_member_serde() {
        let member: Member = serde_json::from_str(r#"{"name":"Eleni","data":[1,1,0]}"#).unwrap();
        assert_eq!(member.name(), "Eleni");
        assert_eq!(member.payment_flags().len(), 3);
        assert_eq!(member.last_paid_index(), Some(1));
    }

    #[test]
    fn test_last_paid_index() {
        assert_eq!(Member::new("a", [false, false]).last_paid_index(), None);
        assert_eq!(Member::new("a", [true, false, true]).last_paid_index(), Some(2));
        assert_eq!(Member::new("a", [false, true, false]).last_paid_index(), Some(1));
        assert_eq!(Member::new("a", Vec::<bool>::new()).last_paid_index(), None);
    }
}
