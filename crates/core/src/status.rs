//! Status enums stored as TEXT columns.
//!
//! Each enum serialises (JSON and SQL) to the exact wire string listed next
//! to its variant. The RSVP values keep the Portuguese spelling the product
//! has always exposed to its clients.

/// Define a closed set of string-valued statuses.
///
/// Generates `as_str` / `from_str_value`, `Display`, serde impls, and
/// sqlx TEXT encode/decode so the enum can be bound and fetched directly.
macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }

            /// Parse the wire representation. Unknown values yield `None`.
            pub fn from_str_value(value: &str) -> Option<Self> {
                match value {
                    $( $text => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                $name::from_str_value(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "unknown {} value '{raw}'",
                        stringify!($name)
                    ))
                })
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let raw = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
                $name::from_str_value(raw).ok_or_else(|| {
                    format!("unknown {} value '{raw}'", stringify!($name)).into()
                })
            }
        }
    };
}

define_text_enum! {
    /// RSVP status shared by guests and companions.
    GuestStatus {
        Pendente => "PENDENTE",
        ConfirmadoPresenca => "CONFIRMADO_PRESENCA",
        ConfirmadoAusencia => "CONFIRMADO_AUSENCIA",
    }
}

define_text_enum! {
    /// Whether a WhatsApp confirmation has been sent to a guest.
    MessageStatus {
        NaoEnviada => "NAO_ENVIADA",
        Enviada => "ENVIADA",
        Erro => "ERRO",
    }
}

define_text_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Active => "ACTIVE",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

define_text_enum! {
    /// Action accepted by the per-guest bulk endpoint.
    BulkAction {
        Confirm => "confirm",
        Decline => "decline",
    }
}

impl Default for GuestStatus {
    fn default() -> Self {
        GuestStatus::Pendente
    }
}

impl Default for MessageStatus {
    fn default() -> Self {
        MessageStatus::NaoEnviada
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Active
    }
}

impl GuestStatus {
    /// Lenient parse used by the CSV importer: unknown or blank -> `PENDENTE`.
    pub fn parse_or_pending(value: &str) -> Self {
        Self::from_str_value(value.trim()).unwrap_or_default()
    }
}

impl BulkAction {
    /// The status applied to the guest and all of their companions.
    pub fn target_status(self) -> GuestStatus {
        match self {
            BulkAction::Confirm => GuestStatus::ConfirmadoPresenca,
            BulkAction::Decline => GuestStatus::ConfirmadoAusencia,
        }
    }
}
