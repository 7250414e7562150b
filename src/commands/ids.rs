//! Identifier generation command.

use std::sync::Arc;

use clap::{Args, ValueEnum};

use abyss_auth::identifier::{DEFAULT_NANO_ID_LEN, IdentifierFactory, SlugOptions, TokenEncoding};
use abyss_auth::random::RandomSource;
use abyss_core::config::AppConfig;
use abyss_core::error::AppError;
use abyss_core::traits::SystemClock;

use crate::output::{self, OutputFormat};

/// Identifier kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum IdKind {
    /// One of each kind
    #[default]
    Set,
    /// Random UUID
    UuidV4,
    /// Time-ordered UUID
    UuidV7,
    /// Hex token
    Token,
    /// Base64 token
    Base64,
    /// Base62 token
    Base62,
    /// URL-safe nano id
    Nano,
    /// `prefix_YYYYMMDD_xxxxxxxx` slug
    Slug,
}

/// Arguments for `ids`
#[derive(Debug, Args)]
pub struct IdsArgs {
    /// Kind of identifier
    #[arg(value_enum, default_value = "set")]
    pub kind: IdKind,

    /// Length in bytes (tokens) or characters (nano id); configured default when omitted
    #[arg(short, long)]
    pub length: Option<usize>,

    /// Slug prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Include today's date in slugs
    #[arg(long)]
    pub dated: bool,
}

/// Generate and print identifiers
pub fn execute(
    args: &IdsArgs,
    config: &AppConfig,
    random: Arc<dyn RandomSource>,
    format: OutputFormat,
) -> Result<(), AppError> {
    config.identifier.validate()?;
    let ids = IdentifierFactory::new(&config.identifier, random, Arc::new(SystemClock));
    let len = args.length.unwrap_or_else(|| ids.default_length());

    let value = match args.kind {
        IdKind::Set => {
            output::print_item(&ids.token_set(), format);
            return Ok(());
        }
        IdKind::UuidV4 => ids.uuid_v4().to_string(),
        IdKind::UuidV7 => ids.uuid_v7().to_string(),
        IdKind::Token => ids.random_token(len, TokenEncoding::Hex),
        IdKind::Base64 => ids.random_token(len, TokenEncoding::Base64),
        IdKind::Base62 => ids.base62_token(len),
        IdKind::Nano => ids.nano_id(args.length.unwrap_or(DEFAULT_NANO_ID_LEN)),
        IdKind::Slug => ids.slug(&SlugOptions {
            prefix: args.prefix.clone(),
            include_date: args.dated,
        }),
    };
    output::print_value("id", &value, format);
    Ok(())
}
