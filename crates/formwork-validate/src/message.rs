//! Default failure messages.

use std::fmt::Display;

pub(crate) fn required(field: &str) -> String {
    format!("{field} is required.")
}

pub(crate) const FILE_UNREADABLE: &str = "Could not read file.";

pub(crate) fn empty_file(field: &str) -> String {
    format!("{field} is required and cannot be an empty file.")
}

pub(crate) fn min_length(field: &str, length: usize) -> String {
    format!("{field} must be at least {length} characters long.")
}

pub(crate) fn max_length(field: &str, length: usize) -> String {
    format!("{field} cannot be more than {length} characters long.")
}

pub(crate) fn length_range(field: &str, min: usize, max: usize) -> String {
    format!("{field} must be between {min} and {max} characters long.")
}

pub(crate) fn must_match(first: &str, second: &str) -> String {
    format!("{first} and {second} must match.")
}

pub(crate) fn bad_format(field: &str) -> String {
    format!("{field} must be correctly formatted.")
}

/// `"age must be an integer."`, `"price must be a number."`
pub(crate) fn wrong_type(field: &str, noun: &str) -> String {
    format!("{field} must be {} {noun}.", article(noun))
}

pub(crate) fn comparison(field: &str, relation: &str, bound: impl Display) -> String {
    format!("{field} must be {relation} {bound}.")
}

pub(crate) fn file_ext(got: Option<&str>, allowed: &[&str]) -> String {
    let mut msg = match got {
        Some(ext) => format!("The file extension .{ext} is not allowed."),
        None => "Files without an extension are not allowed.".to_string(),
    };
    if !allowed.is_empty() {
        msg.push_str(" Allowed extensions include: ");
        msg.push_str(&human_list(allowed));
        msg.push('.');
    }
    msg
}

fn article(noun: &str) -> &'static str {
    match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// `a`, `a and b`, `a, b, and c`
fn human_list(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}
