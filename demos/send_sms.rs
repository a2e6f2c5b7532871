use std::io;

use dysms::{
    Credentials, DysmsClient, PhoneNumber, RegionId, SendOptions, SendSms, SignName, TemplateCode,
};
use tracing_subscriber::EnvFilter;

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let phones_raw = required("DYSMS_PHONES")?;
    let sign_name = required("DYSMS_SIGN_NAME")?;
    let template_code = required("DYSMS_TEMPLATE_CODE")?;
    let region = std::env::var("DYSMS_REGION_ID").unwrap_or_else(|_| "cn-hangzhou".to_owned());

    let phones = phones_raw
        .split(',')
        .map(PhoneNumber::new)
        .collect::<Result<Vec<_>, _>>()?;

    let mut options = SendOptions::default();
    // DYSMS_TEMPLATE_PARAM takes `key=value` pairs separated by commas.
    if let Ok(params) = std::env::var("DYSMS_TEMPLATE_PARAM") {
        for pair in params.split(',').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            options.template_param.insert(key, value);
        }
    }
    if let Ok(out_id) = std::env::var("DYSMS_OUT_ID") {
        options.out_id = Some(dysms::OutId::new(out_id)?);
    }

    let client = DysmsClient::new(Credentials::from_env()?);
    let request = SendSms::new(
        RegionId::new(region)?,
        phones,
        SignName::new(sign_name)?,
        TemplateCode::new(template_code)?,
        options,
    )?;

    let response = client.send_sms(&request).await?;
    println!(
        "code: {:?}, message: {:?}, request_id: {:?}, biz_id: {:?}",
        response.envelope.code.as_str(),
        response.envelope.message,
        response.envelope.request_id,
        response.biz_id
    );

    Ok(())
}
