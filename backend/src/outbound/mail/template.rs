//! Rendering of the gate pass notification email.
//!
//! Every record field appears in both the HTML and the plain-text part.
//! User-supplied text is escaped before it is placed in HTML.

use html_escape::encode_text;

use crate::domain::{GatePassRecord, GatePassStatus};

pub(super) fn subject(record: &GatePassRecord) -> String {
    format!("Gate Pass Request #{} - {}", record.id, record.name)
}

fn status_line(status: &GatePassStatus) -> String {
    match status {
        GatePassStatus::Pending => "PENDING APPROVAL".to_owned(),
        GatePassStatus::Approved => "APPROVED".to_owned(),
        GatePassStatus::Rejected => "REJECTED".to_owned(),
        GatePassStatus::Other(raw) => raw.to_uppercase(),
    }
}

pub(super) fn html_body(record: &GatePassRecord) -> String {
    let rows = [
        ("Gate Pass ID:", format!("#{}", record.id)),
        ("Name:", encode_text(&record.name).into_owned()),
        ("Department:", encode_text(&record.department).into_owned()),
        ("Requester Email:", encode_text(&record.user_email).into_owned()),
        ("Timestamp:", encode_text(&record.timestamp).into_owned()),
    ];
    let table_rows: String = rows
        .iter()
        .map(|(label, value)| format!("<tr><td><strong>{label}</strong></td><td>{value}</td></tr>\n"))
        .collect();

    format!(
        "<html>\n<body>\n\
         <p><strong>New Gate Pass Request Submitted</strong></p>\n\
         <table border=\"1\" style=\"border-collapse: collapse; width: 100%;\">\n\
         {table_rows}\
         <tr><td colspan=\"2\"><strong>Reason for Pass:</strong></td></tr>\n\
         <tr><td colspan=\"2\"><pre>{reason}</pre></td></tr>\n\
         </table>\n\
         <p><strong>Status: {status}.</strong></p>\n\
         <p>This is an automated notification. Please review the details.</p>\n\
         </body>\n</html>\n",
        reason = encode_text(&record.reason),
        status = encode_text(&status_line(&record.status)),
    )
}

pub(super) fn plain_body(record: &GatePassRecord) -> String {
    format!(
        "New Gate Pass Request Submitted\n\n\
         Gate Pass ID: #{id}\n\
         Name: {name}\n\
         Department: {department}\n\
         Requester Email: {email}\n\
         Timestamp: {timestamp}\n\n\
         Reason for Pass:\n{reason}\n\n\
         Status: {status}.\n\n\
         This is an automated notification. Please review the details.\n",
        id = record.id,
        name = record.name,
        department = record.department,
        email = record.user_email,
        timestamp = record.timestamp,
        reason = record.reason,
        status = status_line(&record.status),
    )
}
