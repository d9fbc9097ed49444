use crate::core::models::protocol::RestraintNames;
use crate::core::models::restraint::{RestraintKind, RestraintRecord, StageRestraints};
use std::fmt::Display;
use std::io::{self, Write};

const INDENT: &str = "    ";
const KEY_WIDTH: usize = 16;

/// Writes the nested `key = value` / `key = { ... }` syntax shared by `.msj` and `.cfg` files.
pub(crate) struct BlockWriter<'w, W: Write> {
    writer: &'w mut W,
    depth: usize,
}

impl<'w, W: Write> BlockWriter<'w, W> {
    pub(crate) fn new(writer: &'w mut W) -> Self {
        Self { writer, depth: 0 }
    }

    fn indent(&self) -> String {
        INDENT.repeat(self.depth)
    }

    pub(crate) fn raw(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}{}", self.indent(), line)
    }

    pub(crate) fn blank(&mut self) -> io::Result<()> {
        writeln!(self.writer)
    }

    pub(crate) fn field(&mut self, key: &str, value: impl Display) -> io::Result<()> {
        writeln!(
            self.writer,
            "{}{:<width$} = {}",
            self.indent(),
            key,
            value,
            width = KEY_WIDTH
        )
    }

    pub(crate) fn quoted(&mut self, key: &str, value: impl Display) -> io::Result<()> {
        self.field(key, format_args!("\"{value}\""))
    }

    /// A second line of a multi-line value, aligned under the value of the previous field.
    pub(crate) fn continuation(&mut self, value: &str) -> io::Result<()> {
        writeln!(
            self.writer,
            "{}{}{}",
            self.indent(),
            " ".repeat(KEY_WIDTH + 3),
            value
        )
    }

    /// Opens `name {` without an `=`, as used by top-level `.msj` blocks.
    pub(crate) fn open_stage(&mut self, name: &str) -> io::Result<()> {
        self.raw(&format!("{name} {{"))?;
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn open(&mut self, key: &str) -> io::Result<()> {
        self.field(key, "{")?;
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn open_list(&mut self, key: &str) -> io::Result<()> {
        self.field(key, "[")?;
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn open_anonymous(&mut self) -> io::Result<()> {
        self.raw("{")?;
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn close(&mut self) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.raw("}")
    }

    pub(crate) fn close_list(&mut self) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.raw("]")
    }
}

/// Formats a list of numbers as `[a b c]`.
pub(crate) fn number_list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(" "))
}

fn atom_list(record: &RestraintRecord) -> String {
    let items: Vec<String> = record
        .atom_group()
        .iter()
        .map(|atom| format!("\"{atom}\""))
        .collect();
    format!("[{}]", items.join(" "))
}

/// Writes a `restraints.new = [ ... ]` list, or nothing when the stage has no restraints.
///
/// Positional force constants are repeated once per Cartesian axis.
pub(crate) fn write_restraints<W: Write>(
    out: &mut BlockWriter<'_, W>,
    restraints: &StageRestraints,
    names: &RestraintNames,
) -> io::Result<()> {
    if restraints.is_empty() {
        return Ok(());
    }
    out.open_list("restraints.new")?;
    for record in restraints.iter().flat_map(|set| set.iter()) {
        let kind = record.kind();
        out.open_anonymous()?;
        out.field("name", names.get(kind))?;
        out.field("atoms", atom_list(record))?;
        let force = record.force_text();
        let forces = if kind == RestraintKind::Positional {
            format!("[{force} {force} {force}]")
        } else {
            format!("[{force}]")
        };
        out.field("force_constants", forces)?;
        if let (Some(constant), Some(value)) = (kind.constant(), record.constant_text()) {
            out.field(constant.name(), value)?;
        }
        out.close()?;
    }
    out.close_list()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::restraint::StageRestraintSet;

    fn render(f: impl FnOnce(&mut BlockWriter<'_, Vec<u8>>) -> io::Result<()>) -> String {
        let mut buffer = Vec::new();
        let mut out = BlockWriter::new(&mut buffer);
        f(&mut out).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn nested_blocks_are_indented_and_padded() {
        let text = render(|out| {
            out.open_stage("simulate")?;
            out.quoted("title", "Stage")?;
            out.open("ensemble")?;
            out.field("class", "NVT")?;
            out.close()?;
            out.close()
        });
        assert_eq!(
            text,
            "simulate {\n    title            = \"Stage\"\n    ensemble         = {\n        class            = NVT\n    }\n}\n"
        );
    }

    #[test]
    fn number_list_uses_shortest_float_form() {
        assert_eq!(number_list(&[0.002, 0.002, 0.006]), "[0.002 0.002 0.006]");
        assert_eq!(number_list(&[50.0]), "[50]");
    }

    #[test]
    fn restraints_are_written_in_kind_order_with_their_constants() {
        let mut restraints = StageRestraints::default();
        restraints.insert(StageRestraintSet::from_records(
            RestraintKind::Distance,
            vec![RestraintRecord::new(
                RestraintKind::Distance,
                vec!["a1".into(), "a2".into()],
                5.0,
                Some(1.5),
            )],
        ));
        restraints.insert(StageRestraintSet::from_records(
            RestraintKind::Positional,
            vec![RestraintRecord::new(
                RestraintKind::Positional,
                vec!["protein".into()],
                50.0,
                None,
            )],
        ));
        let text = render(|out| write_restraints(out, &restraints, &RestraintNames::default()));

        let posre = text.find("posre_harm").unwrap();
        let stretch = text.find("stretch_harm").unwrap();
        assert!(posre < stretch);
        assert!(text.starts_with("restraints.new   = [\n"));
        assert!(text.contains("force_constants  = [50 50 50]"));
        assert!(text.contains("atoms            = [\"a1\" \"a2\"]"));
        assert!(text.contains("r0               = 1.5"));
        assert!(text.ends_with("]\n"));
    }

    #[test]
    fn restraint_values_are_echoed_as_entered() {
        let mut restraints = StageRestraints::default();
        restraints.insert(StageRestraintSet::from_records(
            RestraintKind::Positional,
            vec![
                RestraintRecord::new(RestraintKind::Positional, vec!["protein".into()], 50.0, None)
                    .with_tokens("50.0", None),
            ],
        ));
        restraints.insert(StageRestraintSet::from_records(
            RestraintKind::Angle,
            vec![
                RestraintRecord::new(
                    RestraintKind::Angle,
                    vec!["a".into(), "b".into(), "c".into()],
                    5.0,
                    Some(120.0),
                )
                .with_tokens("5.00", Some("120.0")),
            ],
        ));
        let text = render(|out| write_restraints(out, &restraints, &RestraintNames::default()));
        assert!(text.contains("force_constants  = [50.0 50.0 50.0]"));
        assert!(text.contains("force_constants  = [5.00]"));
        assert!(text.contains("theta0           = 120.0"));
    }

    #[test]
    fn empty_restraints_write_nothing() {
        let text = render(|out| {
            write_restraints(out, &StageRestraints::default(), &RestraintNames::default())
        });
        assert!(text.is_empty());
    }
}
