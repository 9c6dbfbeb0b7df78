//! Descriptor table for the flat field keys understood by the adapter.
//!
//! Form submissions and import rows address subscriber attributes by a
//! string key; the table below enumerates the recognized keys together
//! with their coercion rule and French display label, so nothing resolves
//! attribute names dynamically.

/// Coercion rule applied to the raw string value of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Copied verbatim when present and non-blank.
    Text,
    /// Accepted only when the trimmed value is all digits; otherwise the
    /// prior value is kept.
    Digits,
    /// Comma-or-dot decimal; unparsable input falls back to `0.0`.
    Price,
    /// French `dd/mm/yyyy` date.
    DateFr,
}

impl FieldKind {
    /// Whether a trimmed raw value is acceptable under this rule.
    ///
    /// `Digits` takes unsigned decimal digits only; a stray sign or
    /// separator is rejected rather than half-parsed.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            FieldKind::Digits => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            FieldKind::Text | FieldKind::Price | FieldKind::DateFr => !value.is_empty(),
        }
    }
}

/// A recognized field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    SubscriberId,
    Lastname,
    Firstname,
    Company,
    NameAddition,
    Address,
    AddressAddition,
    PostCode,
    City,
    EmailAddress,
    SubscriberSinceIssue,
    SubscriptionDate,
    IssuesToReceive,
    SubsBeginningIssue,
    Member,
    SubscriptionPrice,
    MembershipPrice,
    HorsSerie1,
    Bank,
    OrderingType,
    StickerSent,
    Comment,
}

impl FieldKey {
    /// The wire/form key for this field.
    pub fn key(self) -> &'static str {
        match self {
            FieldKey::SubscriberId => "subscriber_id",
            FieldKey::Lastname => "lastname",
            FieldKey::Firstname => "firstname",
            FieldKey::Company => "company",
            FieldKey::NameAddition => "name_addition",
            FieldKey::Address => "address",
            FieldKey::AddressAddition => "address_addition",
            FieldKey::PostCode => "post_code",
            FieldKey::City => "city",
            FieldKey::EmailAddress => "email_address",
            FieldKey::SubscriberSinceIssue => "subscriber_since_issue",
            FieldKey::SubscriptionDate => "subscription_date",
            FieldKey::IssuesToReceive => "issues_to_receive",
            FieldKey::SubsBeginningIssue => "subs_beginning_issue",
            FieldKey::Member => "member",
            FieldKey::SubscriptionPrice => "subscription_price",
            FieldKey::MembershipPrice => "membership_price",
            FieldKey::HorsSerie1 => "hors_serie1",
            FieldKey::Bank => "bank",
            FieldKey::OrderingType => "ordering_type",
            FieldKey::StickerSent => "sticker_sent",
            FieldKey::Comment => "comment",
        }
    }

    /// French display label, as shown on list headers.
    pub fn label(self) -> &'static str {
        match self {
            FieldKey::SubscriberId => "Identifiant",
            FieldKey::Lastname => "Nom",
            FieldKey::Firstname => "Prénom",
            FieldKey::Company => "Société",
            FieldKey::NameAddition => "Complément de Nom",
            FieldKey::Address => "Adresse",
            FieldKey::AddressAddition => "Complément d'Adresse",
            FieldKey::PostCode => "Code Postal",
            FieldKey::City => "Ville",
            FieldKey::EmailAddress => "Adresse email",
            FieldKey::SubscriberSinceIssue => "Abonné depuis numero",
            FieldKey::SubscriptionDate => "Date d'abonnement",
            FieldKey::IssuesToReceive => "Numeros à recevoir",
            FieldKey::SubsBeginningIssue => "Premier numéro de l'abonnement en cours",
            FieldKey::Member => "Membre",
            FieldKey::SubscriptionPrice => "Prix de l'abonnement",
            FieldKey::MembershipPrice => "Prix de l'adhésion",
            FieldKey::HorsSerie1 => "Hors Series à recevoir",
            FieldKey::Bank => "Banque",
            FieldKey::OrderingType => "Moyen de paiement",
            FieldKey::StickerSent => "Sticker envoyé",
            FieldKey::Comment => "Commentaire",
        }
    }

    /// Coercion rule for this field.
    pub fn kind(self) -> FieldKind {
        match self {
            FieldKey::SubscriberId
            | FieldKey::PostCode
            | FieldKey::SubscriberSinceIssue
            | FieldKey::IssuesToReceive
            | FieldKey::SubsBeginningIssue
            | FieldKey::Member
            | FieldKey::HorsSerie1
            | FieldKey::StickerSent => FieldKind::Digits,
            FieldKey::SubscriptionPrice | FieldKey::MembershipPrice => FieldKind::Price,
            FieldKey::SubscriptionDate => FieldKind::DateFr,
            _ => FieldKind::Text,
        }
    }
}
