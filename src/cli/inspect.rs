use super::BundleArgs;
use crate::{
    bundle::Bundle,
    data::{BagKind, LocalKeyId, SafeBagExt},
};
use pkcs12::safe_bag::SafeBag;
use serde::Serialize;
use x509_parser::parse_x509_certificate;

#[derive(clap::Args, Debug)]
pub struct Options {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub bundle: BundleArgs,
}

/// What we can tell about a bag without decrypting keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BagInfo {
    pub kind: BagKind,
    pub local_key_id: Option<String>,
    pub friendly_name: Option<String>,
    pub subject: Option<String>,
    pub serial: Option<String>,
    /// If this is the key bag used for signing
    pub selected: bool,
}

impl BagInfo {
    fn new(bag: &SafeBag, selected_id: &LocalKeyId) -> Self {
        let kind = bag.kind();
        let local_key_id = bag.local_key_id();

        let (subject, serial) = match bag.certificate() {
            Some(der) => match parse_x509_certificate(&der) {
                Ok((_, cert)) => (
                    Some(cert.subject().to_string()),
                    Some(cert.raw_serial_as_string()),
                ),
                Err(err) => {
                    log::warn!("Failed to parse certificate: {err}");
                    (None, None)
                }
            },
            None => (None, None),
        };

        Self {
            kind,
            selected: kind.is_key() && local_key_id.as_ref() == Some(selected_id),
            local_key_id: local_key_id.map(|id| id.to_string()),
            friendly_name: bag.friendly_name(),
            subject,
            serial,
        }
    }
}

pub fn describe(bundle: &Bundle, selected_id: &LocalKeyId) -> Vec<BagInfo> {
    bundle
        .bags()
        .iter()
        .map(|bag| BagInfo::new(bag, selected_id))
        .collect()
}

pub(crate) fn run(options: Options) -> anyhow::Result<()> {
    let config = options.bundle.into_config()?;
    let bundle = Bundle::open(&config.bundle, &config.passphrase)?;

    let bags = describe(&bundle, &config.local_key_id);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&bags)?);
        return Ok(());
    }

    for (n, bag) in bags.iter().enumerate() {
        let marker = if bag.selected { " (selected)" } else { "" };
        println!("Bag #{n}: {}{marker}", bag.kind);

        if let Some(id) = &bag.local_key_id {
            println!("  Local key id:  {id}");
        }
        if let Some(name) = &bag.friendly_name {
            println!("  Friendly name: {name}");
        }
        if let Some(subject) = &bag.subject {
            println!("  Subject:       {subject}");
        }
        if let Some(serial) = &bag.serial {
            println!("  Serial:        {serial}");
        }
    }

    if !bags.iter().any(|bag| bag.selected) {
        log::warn!("No key bag matches the local key id {}", config.local_key_id);
    }

    Ok(())
}
