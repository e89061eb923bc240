//! Person list formatting

use crate::models::Person;

pub fn format_person_list(people: &[Person]) -> String {
    if people.is_empty() {
        return "No people yet. Add someone with `splitledger person add <name>`.\n".to_string();
    }

    let name_width = super::column_width(people.iter().map(|p| p.name.as_str()), 4);

    let mut output = format!("{:<name_width$}  {:<12}  {}\n", "Name", "ID", "Added");
    output.push_str(&format!("{:-<name_width$}  {:-<12}  {:-<10}\n", "", "", ""));

    for person in people {
        output.push_str(&format!(
            "{:<name_width$}  {:<12}  {}\n",
            person.name,
            person.id.to_string(),
            person.created_at.format("%Y-%m-%d"),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_person_list() {
        let people = vec![Person::new("Alice"), Person::new("Bartholomew")];

        let output = format_person_list(&people);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Name         ID"));
        assert!(lines[2].starts_with("Alice        per-"));
        assert!(lines[3].starts_with("Bartholomew  per-"));
    }

    #[test]
    fn test_empty_list() {
        assert!(format_person_list(&[]).starts_with("No people yet"));
    }
}
