use clap::Args;
use parishsync_core::liturgical;
use parishsync_core::remote::DayLookupClient;
use parishsync_core::LiturgicalData;

use super::{parse_date, CliResult};

/// Default base URL of the liturgical day service.
const DAY_API_BASE: &str = "https://api.parishsync.app";

#[derive(Args)]
pub struct TodayArgs {
    /// Date to look up (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,
    /// Jurisdiction slug for the remote lookup
    #[arg(long, default_value = "goarch")]
    pub jurisdiction: String,
    /// Skip the remote service and use the bundled data only
    #[arg(long)]
    pub local: bool,
    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: TodayArgs) -> CliResult {
    let date = parse_date(args.date.as_deref())?;
    let data = LiturgicalData::builtin();
    let season = liturgical::liturgical_season(&data, date);

    let info = if args.local {
        local_info(&data, date)
    } else {
        let mut client = DayLookupClient::new(DAY_API_BASE, data.clone())?;
        client.fetch_day(&args.jurisdiction, date)
    };

    if args.json {
        let mut value = serde_json::to_value(&info)?;
        value["season"] = serde_json::Value::String(season.to_string());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{date}  ({season})");
    if let Some(ref feast) = info.feast {
        println!("feast:   {feast}");
    }
    for saint in &info.saints {
        println!("saint:   {saint}");
    }
    if let Some(ref epistle) = info.readings.epistle {
        println!("epistle: {epistle}");
    }
    if let Some(ref gospel) = info.readings.gospel {
        println!("gospel:  {gospel}");
    }
    println!("fasting: {:?}", info.fasting);
    if let Some(tone) = info.tone {
        println!("tone:    {tone}");
    }
    Ok(())
}

fn local_info(data: &LiturgicalData, date: chrono::NaiveDate) -> parishsync_core::DayInfo {
    use parishsync_core::remote::{DayInfo, DaySource, Readings};
    let events = liturgical::events_for_date(data, date);
    DayInfo {
        saints: events.iter().map(|e| e.name.clone()).collect(),
        readings: Readings::default(),
        fasting: liturgical::fasting_level(data, date),
        feast: events.first().map(|e| e.name.clone()),
        tone: Some(liturgical::choir_tone(data, date)),
        source: DaySource::Local,
    }
}
