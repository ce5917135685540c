use chrono::{DateTime, NaiveDate, Utc};

/// Turn a snake_case field key into a display label.
/// `first_name` becomes `First Name`; dotted paths keep their separators.
pub fn humanize_field(field: &str) -> String {
    let mut label = String::with_capacity(field.len());
    let mut word_start = true;
    for c in field.chars() {
        if c == '_' {
            label.push(' ');
            word_start = true;
        } else if c.is_alphanumeric() {
            if word_start {
                label.extend(c.to_uppercase());
            } else {
                label.push(c);
            }
            word_start = false;
        } else {
            label.push(c);
            word_start = true;
        }
    }
    label
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%b %d, %Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_field() {
        assert_eq!(humanize_field("first_name"), "First Name");
        assert_eq!(humanize_field("email"), "Email");
        assert_eq!(humanize_field("non_field_errors"), "Non Field Errors");
        assert_eq!(humanize_field("educations.school_name"), "Educations.School Name");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Şirket yönetimi", 9), "Şirket...");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_date(&date), "Mar 09, 2024");
    }
}
