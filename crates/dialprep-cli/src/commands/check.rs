use crate::commands::{print_json, Context};
use crate::error::rejected;
use crate::util::PolicyArgs;
use anyhow::Result;
use clap::Args;
use dialprep_core::{CellValue, PhoneNormalizer, Rejection};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct CheckArgs {
    pub phone: String,
    #[arg(long)]
    pub area_code: Option<String>,
    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    input: String,
    valid: bool,
    area_code: Option<String>,
    subscriber_number: Option<String>,
    rejection: Option<Rejection>,
}

pub fn check_phone(ctx: &Context<'_>, args: CheckArgs) -> Result<()> {
    let normalizer = PhoneNormalizer::new(args.policy.apply(&ctx.config.normalize)?);
    let area_code = args.area_code.as_deref().map(CellValue::from);
    let outcome = normalizer.normalize(&CellValue::from(args.phone.as_str()), area_code.as_ref());

    if ctx.json {
        let report = match &outcome {
            Ok(phone) => CheckReport {
                input: args.phone.clone(),
                valid: true,
                area_code: Some(phone.area_code().to_string()),
                subscriber_number: Some(phone.subscriber_number().to_string()),
                rejection: None,
            },
            Err(reason) => CheckReport {
                input: args.phone.clone(),
                valid: false,
                area_code: None,
                subscriber_number: None,
                rejection: Some(*reason),
            },
        };
        print_json(&report)?;
    }

    match outcome {
        Ok(phone) => {
            if !ctx.json {
                println!("{} {}", phone.area_code(), phone.subscriber_number());
            }
            Ok(())
        }
        Err(reason) => Err(rejected(format!("{} ({})", args.phone, reason))),
    }
}
