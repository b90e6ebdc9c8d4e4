use std::fmt;
use std::str::FromStr;

/// Which side of the channel an endpoint plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Sender,
    Receiver,
}

impl Role {
    /// The discriminator argument passed to endpoint commands.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Sender => "sender",
            Role::Receiver => "receiver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role string other than `sender` or `receiver`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role {0:?} (must be one of: sender, receiver)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sender" => Ok(Role::Sender),
            "receiver" => Ok(Role::Receiver),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        assert_eq!("sender".parse::<Role>().unwrap(), Role::Sender);
        assert_eq!("receiver".parse::<Role>().unwrap(), Role::Receiver);
        assert_eq!(Role::Receiver.to_string(), "receiver");
    }

    #[test]
    fn rejects_unknown_roles() {
        let err = "Sender".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("Sender".to_string()));
        assert!(err.to_string().contains("must be one of"));
    }
}
