use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, StringRecord};
use listsync_models::{ImdbItem, TitleType};
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;
use crate::error::SourceError;

/// Parse an IMDb list export (custom list or watchlist)
pub fn parse_list_csv<R: Read>(input: R) -> Result<Vec<ImdbItem>, SourceError> {
    let mut reader = Reader::from_reader(input);
    let header_map = read_headers(&mut reader, &["Const", "Title Type"])?;

    let mut items = Vec::new();
    let mut row_count = 0;
    for result in reader.records() {
        let record = result.map_err(|e| SourceError::Parse(format!("list export: {}", e)))?;
        row_count += 1;

        let imdb_id = field(&record, &header_map, "Const");
        if imdb_id.is_empty() {
            debug!(row = row_count, "Skipping row with empty IMDb id");
            continue;
        }

        items.push(ImdbItem::new(imdb_id, TitleType::parse(field(&record, &header_map, "Title Type"))));
    }

    debug!(rows = row_count, items = items.len(), "Parsed IMDb list export");
    Ok(items)
}

/// Parse an IMDb ratings export
pub fn parse_ratings_csv<R: Read>(input: R) -> Result<Vec<ImdbItem>, SourceError> {
    let mut reader = Reader::from_reader(input);
    let header_map = read_headers(&mut reader, &["Const", "Your Rating", "Date Rated", "Title Type"])?;

    let mut ratings = Vec::new();
    let mut row_count = 0;
    for result in reader.records() {
        let record = result.map_err(|e| SourceError::Parse(format!("ratings export: {}", e)))?;
        row_count += 1;

        let imdb_id = field(&record, &header_map, "Const");
        if imdb_id.is_empty() {
            debug!(row = row_count, "Skipping row with empty IMDb id");
            continue;
        }

        let rating = parse_rating(field(&record, &header_map, "Your Rating"))?;
        let rated_at = parse_date(field(&record, &header_map, "Date Rated"))?;
        let title_type = TitleType::parse(field(&record, &header_map, "Title Type"));

        ratings.push(ImdbItem::new(imdb_id, title_type).with_rating(rating, rated_at));
    }

    debug!(rows = row_count, ratings = ratings.len(), "Parsed IMDb ratings export");
    Ok(ratings)
}

fn read_headers<R: Read>(reader: &mut Reader<R>, required: &[&str]) -> Result<HashMap<String, usize>, SourceError> {
    let headers = reader
        .headers()
        .map_err(|e| SourceError::Parse(format!("CSV header: {}", e)))?
        .clone();
    // Exports start with a UTF-8 byte order mark
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_string(), i))
        .collect();

    for col in required {
        if !header_map.contains_key(*col) {
            let available: Vec<&str> = headers.iter().collect();
            return Err(SourceError::Parse(format!(
                "missing required column: {}. Available columns: {:?}",
                col, available
            )));
        }
    }
    Ok(header_map)
}

fn field<'r>(record: &'r StringRecord, header_map: &HashMap<String, usize>, column: &str) -> &'r str {
    header_map
        .get(column)
        .and_then(|&i| record.get(i))
        .unwrap_or("")
        .trim()
}

fn parse_rating(raw: &str) -> Result<u8, SourceError> {
    match raw.parse::<u8>() {
        Ok(rating) if (1..=10).contains(&rating) => Ok(rating),
        _ => Err(SourceError::Parse(format!("invalid rating '{}'", raw))),
    }
}

/// `YYYY-MM-DD` at midnight UTC
fn parse_date(raw: &str) -> Result<DateTime<Utc>, SourceError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SourceError::Parse(format!("invalid date '{}'", raw)))
}
