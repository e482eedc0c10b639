//! [`Profile`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::offer::product::Category;

/// Profile of a marketplace member.
///
/// Profiles are created by the identity provider on sign up, and then
/// completed by their owners.
#[derive(Clone, Debug)]
pub struct Profile {
    /// ID of this [`Profile`], shared with the identity provider.
    pub id: Id,

    /// Full [`Name`] of this [`Profile`].
    pub name: Name,

    /// [`Role`] of this [`Profile`].
    pub role: Role,

    /// [`ProviderKind`] of this [`Profile`], if it's a [`Role::Provider`].
    pub provider_kind: Option<ProviderKind>,

    /// Contact [`Phone`] of this [`Profile`].
    pub phone: Option<Phone>,

    /// [`Address`] of this [`Profile`] inside the residential complex.
    pub address: Option<Address>,

    /// [`CondoName`] of the residential complex this [`Profile`] lives in.
    pub condo_name: Option<CondoName>,

    /// Tax [`Document`] of this [`Profile`], if it's a [`Role::Provider`].
    pub document: Option<Document>,

    /// [`Category`]s this [`Profile`] works in, if it's a
    /// [`Role::Provider`].
    pub categories: Vec<Category>,

    /// Indicator whether this [`Profile`] operates the platform.
    pub is_admin: bool,

    /// [`DateTime`] when this [`Profile`] was created.
    pub created_at: CreationDateTime,
}

impl Profile {
    /// Indicates whether this [`Profile`] may sell on the platform.
    #[must_use]
    pub fn is_provider(&self) -> bool {
        self.role == Role::Provider
    }
}

/// ID of a [`Profile`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Role of a [`Profile`]."]
    enum Role {
        #[doc = "Resident of the complex, buying and booking."]
        Resident = "resident",

        #[doc = "Provider selling services or products."]
        Provider = "provider",
    }
}

define_kind! {
    #[doc = "What a [`Role::Provider`] mainly offers."]
    enum ProviderKind {
        #[doc = "Bookable services (salons, repairs, classes)."]
        Service = "service",

        #[doc = "Orderable products (food, crafts)."]
        Product = "product",
    }
}

/// Full name of a [`Profile`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] without checking its format.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Contact phone number, as typed by its owner.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] without checking its format.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `phone` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    /// Creates a new [`Phone`] if the given `phone` is valid.
    #[must_use]
    pub fn new(phone: impl Into<String>) -> Option<Self> {
        let phone = phone.into();
        Self::check(&phone).then_some(Self(phone))
    }

    /// Returns the digits of this [`Phone`] in international form, as
    /// expected by messaging links.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }

    /// Checks whether the given `phone` is a valid [`Phone`].
    fn check(phone: impl AsRef<str>) -> bool {
        /// Optional leading `+`, then digits with common separators.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?[0-9(][0-9 ()\-]{6,22}[0-9]$").expect("valid regex")
        });

        let phone = phone.as_ref();
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        REGEX.is_match(phone) && (8..=15).contains(&digits)
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Address inside the residential complex (block, apartment).
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`] without checking its format.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Returns the [`Address`] used when a resident hasn't filled theirs in.
    #[must_use]
    pub fn placeholder() -> Self {
        Self("Endereço do Cliente".into())
    }

    /// Checks whether the given `address` is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address
            && !address.is_empty()
            && address.len() <= 512
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Address`")
    }
}

/// Name of a residential complex.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct CondoName(String);

impl CondoName {
    /// Creates a new [`CondoName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`CondoName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for CondoName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `CondoName`")
    }
}

/// Tax document of a provider: either a CPF (11 digits) or a CNPJ
/// (14 digits), as typed by its owner.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Document(String);

impl Document {
    /// Creates a new [`Document`] if the given `document` is valid.
    #[must_use]
    pub fn new(document: impl Into<String>) -> Option<Self> {
        let document = document.into();
        Self::check(&document).then_some(Self(document))
    }

    /// Indicates whether this [`Document`] identifies a company (CNPJ).
    #[must_use]
    pub fn is_company(&self) -> bool {
        self.0.chars().filter(char::is_ascii_digit).count() == 14
    }

    /// Checks whether the given `document` is a valid [`Document`].
    fn check(document: impl AsRef<str>) -> bool {
        let document = document.as_ref();
        let digits = document.chars().filter(char::is_ascii_digit).count();
        document
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '/'))
            && document.starts_with(|c: char| c.is_ascii_digit())
            && matches!(digits, 11 | 14)
    }
}

impl FromStr for Document {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Document`")
    }
}

/// [`DateTime`] of a [`Profile`] creation.
pub type CreationDateTime = DateTimeOf<(Profile, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Address, CondoName, Document, Name, Phone};

    #[test]
    fn phone_accepts_common_formats() {
        for phone in ["+55 11 91234-5678", "(11) 91234-5678", "5511912345678"]
        {
            assert!(Phone::new(phone).is_some(), "rejected `{phone}`");
        }

        for phone in ["", "1234", "phone", "+55 11 9123x-5678", " 5511912345678"]
        {
            assert!(Phone::new(phone).is_none(), "accepted `{phone}`");
        }
    }

    #[test]
    fn phone_digits_drop_separators() {
        let phone = Phone::new("+55 (11) 91234-5678").unwrap();
        assert_eq!(phone.digits(), "5511912345678");
    }

    #[test]
    fn names_and_addresses_are_trimmed_and_non_empty() {
        assert!(Name::new("Maria Souza").is_some());
        assert!(Name::new(" Maria").is_none());
        assert!(Name::new("").is_none());

        assert!(Address::new("Bloco B, apto 12").is_some());
        assert!(Address::new("Bloco B ").is_none());
    }

    #[test]
    fn documents_are_cpf_or_cnpj() {
        let cpf = Document::new("123.456.789-09").unwrap();
        assert!(!cpf.is_company());

        let cnpj = Document::new("12.345.678/0001-95").unwrap();
        assert!(cnpj.is_company());

        for doc in ["", "123.456.789", "123.456.789-0A", "-12345678909"] {
            assert!(Document::new(doc).is_none(), "accepted `{doc}`");
        }

        assert!(CondoName::new("Residencial Jardins").is_some());
        assert!(CondoName::new("").is_none());
    }
}
