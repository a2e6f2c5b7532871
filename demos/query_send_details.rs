use std::io;

use dysms::{
    BizId, Credentials, DysmsClient, Format, PhoneNumber, QueryOptions, QuerySendDetails,
    RegionId, RequestOptions, SendDate,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let phone = std::env::var("DYSMS_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "DYSMS_PHONE environment variable is required",
        )
    })?;
    let send_date = std::env::var("DYSMS_SEND_DATE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "DYSMS_SEND_DATE environment variable is required (yyyyMMdd)",
        )
    })?;
    let format = match std::env::var("DYSMS_FORMAT").as_deref() {
        Ok("XML") | Ok("xml") => Format::Xml,
        _ => Format::Json,
    };

    let options = QueryOptions {
        biz_id: std::env::var("DYSMS_BIZ_ID").ok().map(BizId::new).transpose()?,
        page_size: std::env::var("DYSMS_PAGE_SIZE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default(),
        current_page: std::env::var("DYSMS_CURRENT_PAGE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default(),
        region_id: Some(RegionId::new(
            std::env::var("DYSMS_REGION_ID").unwrap_or_else(|_| "cn-hangzhou".to_owned()),
        )?),
    };
    let request = QuerySendDetails::new(
        PhoneNumber::new(phone)?,
        SendDate::parse(&send_date)?,
        options,
    );

    let client = DysmsClient::new(Credentials::from_env()?);
    let response = client
        .query_send_details_with(
            &request,
            RequestOptions {
                format: Some(format),
                ..Default::default()
            },
        )
        .await?;

    println!(
        "code: {:?}, total_count: {}, total_page: {}",
        response.envelope.code.as_str(),
        response.total_count,
        response.total_page
    );
    for detail in &response.details {
        println!(
            "{} status={:?} err={} sent={} received={} content={:?}",
            detail.phone_num,
            detail.send_status.known_kind(),
            detail.err_code,
            detail.send_date,
            detail.receive_date,
            detail.content
        );
    }

    Ok(())
}
