use std::{
    fmt::{self, Display},
    ops::{Deref, DerefMut},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// A single mailbox, e.g. `Jane Doe <jane@example.com>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub display_name: Option<String>,
    pub addr: String,
}

impl Address {
    ///
    /// Parse a single mailbox with `mailparse`.
    ///
    /// # Errors
    ///
    /// If the input is not a valid address, or it contains a group or more
    /// than one mailbox.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::Address;
    ///
    /// let address = Address::parse("Jane <jane@example.com>").unwrap();
    /// assert_eq!(address.addr, "jane@example.com");
    /// assert_eq!(address.display_name.as_deref(), Some("Jane"));
    ///
    /// assert!(Address::parse("a@example.com, b@example.com").is_err());
    /// ```
    ///
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let list = mailparse::addrparse(input).map_err(|source| AddressError::Parse {
            input: input.to_string(),
            source,
        })?;

        match list.as_slice() {
            [mailparse::MailAddr::Single(single)] => Ok(Self {
                display_name: single.display_name.clone(),
                addr: single.addr.clone(),
            }),
            _ => Err(AddressError::NotSingle(input.to_string())),
        }
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{name} <{}>", self.addr),
            None => f.write_str(&self.addr),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressList(pub Vec<Address>);

impl Display for AddressList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, addr) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            Display::fmt(addr, f)?;
        }
        Ok(())
    }
}

impl From<Vec<Address>> for AddressList {
    fn from(value: Vec<Address>) -> Self {
        Self(value)
    }
}

impl Deref for AddressList {
    type Target = Vec<Address>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for AddressList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
