//! Spreadsheet export of the booking list.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::booking::Booking;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const SHEET_NAME: &str = "Bookings";

pub const EXPORT_HEADERS: [&str; 6] = [
    "Id",
    "Name",
    "NumberOfTickets",
    "TicketType",
    "BookingDate",
    "BookingNumber",
];

pub const BOOKING_DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// A rendered export ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
    pub row_count: usize,
}

/// One spreadsheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub id: String,
    pub name: String,
    pub number_of_tickets: i32,
    pub ticket_type: &'static str,
    pub booking_date: NaiveDateTime,
    pub booking_number: String,
}

impl From<&Booking> for ExportRow {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            name: booking.name.clone(),
            number_of_tickets: booking.number_of_tickets,
            ticket_type: booking.ticket_type.display_name(),
            booking_date: booking.booking_date.naive_utc(),
            booking_number: booking.booking_number.clone(),
        }
    }
}

/// `bookings_<yyyyMMddHHmmss>.xlsx`, stamped in UTC.
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("bookings_{}.xlsx", at.format("%Y%m%d%H%M%S"))
}

pub fn rows_from(bookings: &[Booking]) -> Vec<ExportRow> {
    bookings.iter().map(ExportRow::from).collect()
}

/// Write a header row plus one row per entry and return the workbook bytes.
pub fn render_workbook(rows: &[ExportRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date_format = Format::new().set_num_format(BOOKING_DATE_FORMAT);

    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, title) in EXPORT_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *title, &header)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            worksheet.write_string(r, 0, row.id.as_str())?;
            worksheet.write_string(r, 1, row.name.as_str())?;
            worksheet.write_number(r, 2, f64::from(row.number_of_tickets))?;
            worksheet.write_string(r, 3, row.ticket_type)?;
            worksheet.write_datetime_with_format(r, 4, &row.booking_date, &date_format)?;
            worksheet.write_string(r, 5, row.booking_number.as_str())?;
        }

        worksheet.autofit();
    }

    workbook.save_to_buffer()
}

/// Render `bookings` (already in listing order) into a downloadable file.
pub fn export_bookings(bookings: &[Booking], at: DateTime<Utc>) -> Result<ExportFile, XlsxError> {
    let rows = rows_from(bookings);
    let bytes = render_workbook(&rows)?;

    Ok(ExportFile {
        bytes,
        filename: export_filename(at),
        content_type: XLSX_CONTENT_TYPE,
        row_count: rows.len(),
    })
}
