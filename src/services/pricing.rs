// src/services/pricing.rs
// DOCUMENTATION: Day-by-day reservation pricing
// PURPOSE: Pure functions, no database access; `today` is passed in so
// date checks are deterministic under test

use crate::errors::DomicareError;
use crate::models::{PriceLine, PriceQuote, QuoteRequest};
use chrono::{NaiveDate, NaiveTime};

/// Longest bookable range, in days
pub const MAX_RESERVATION_DAYS: i64 = 365;

/// Parse an "HH:MM" time of day
pub fn parse_time(value: &str) -> Result<NaiveTime, DomicareError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| DomicareError::InvalidInput(format!("Invalid time '{}', expected HH:MM", value)))
}

/// Hours worked per day between two times of the same day
pub fn daily_hours(start_time: &str, end_time: &str) -> Result<f64, DomicareError> {
    let start = parse_time(start_time)?;
    let end = parse_time(end_time)?;

    if end <= start {
        return Err(DomicareError::InvalidInput(
            "end_time must be after start_time".to_string(),
        ));
    }

    Ok((end - start).num_minutes() as f64 / 60.0)
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Check the date range of a booking
pub fn validate_dates(
    start_date: NaiveDate,
    end_date: NaiveDate,
    today: NaiveDate,
) -> Result<i64, DomicareError> {
    if end_date < start_date {
        return Err(DomicareError::InvalidInput(
            "end_date must not be before start_date".to_string(),
        ));
    }

    if start_date < today {
        return Err(DomicareError::InvalidInput(
            "start_date must not be in the past".to_string(),
        ));
    }

    let days = (end_date - start_date).num_days() + 1;
    if days > MAX_RESERVATION_DAYS {
        return Err(DomicareError::InvalidInput(format!(
            "A reservation cannot exceed {} days",
            MAX_RESERVATION_DAYS
        )));
    }

    Ok(days)
}

/// Build the price breakdown: one line per calendar day, inclusive
pub fn quote(
    req: &QuoteRequest,
    hourly_rate: Option<f64>,
    today: NaiveDate,
) -> Result<PriceQuote, DomicareError> {
    let hourly_rate = hourly_rate.filter(|r| *r > 0.0).ok_or_else(|| {
        DomicareError::InvalidInput("This professionnel has no hourly rate".to_string())
    })?;

    validate_dates(req.start_date, req.end_date, today)?;
    let hours = daily_hours(&req.start_time, &req.end_time)?;

    let days: Vec<PriceLine> = req
        .start_date
        .iter_days()
        .take_while(|day| *day <= req.end_date)
        .map(|date| PriceLine {
            date,
            hours,
            amount: round_cents(hours * hourly_rate),
        })
        .collect();

    let total_price = round_cents(days.iter().map(|line| line.amount).sum());

    Ok(PriceQuote {
        professionnel_id: req.professionnel_id,
        hourly_rate,
        hours_per_day: hours,
        days,
        total_price,
    })
}
