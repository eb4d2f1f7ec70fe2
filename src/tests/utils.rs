use crate::db::connection::{init_db, Database};
use rusqlite::Connection;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

pub const PARENT_CPR: &str = "0101901234";
pub const CHILD_CPR: &str = "1503104321";
pub const SINGLE_CPR: &str = "0505801111";

const SEED_SQL: &str = r#"
insert into adresse_aktuel
  (cpr, adresseringsnavn, borgerligt_navn, adresseringsadresse, postnummer_og_by,
   statsborgerskab, civilstand, adressenoegle, mor_cpr, far_cpr)
values
  ('0101901234', 'Anna M. Hansen', 'Anna Marie Hansen', 'Vestergade 7, 2. tv', '8000 Aarhus C',
   'Danmark', 'Gift', 'K3', null, null),
  ('1503104321', 'Emil Hansen', 'Emil Hansen', 'Vestergade 7, 2. tv', '8000 Aarhus C',
   'Danmark', 'Ugift', 'K3', '0101901234', null),
  ('2002124322', 'Ida Berg', 'Ida Berg', 'Nørregade 1', '5000 Odense C',
   'Danmark', 'Ugift', 'K9', null, '0101901234'),
  ('0505801111', 'Bo Jensen', 'Bo Jensen', 'Torvet 2', '7100 Vejle',
   'Sverige', null, 'K5', null, null);

insert into flyttehistorik (cpr, adressenoegle, dato_tilflyt, dato_fraflyt)
values
  ('0101901234', 'K1', '2005-01-01', '2012-03-01'),
  ('0101901234', 'K2', '2012-03-01', '2018-06-01'),
  ('0101901234', 'K3', '2018-06-01', '9999-12-31'),
  ('0505801111', 'K5', '2010-08-15', '9999-12-31');

insert into adresse_historik (cpr, adressenoegle, vejnavn, hus_nr, etage, side, postnummer, postdistrikt)
values
  ('0101901234', 'K1', 'Søndergade', '3', 'ST', 'TH', '8000', 'Aarhus C'),
  ('0101901234', 'K2', 'Bygaden', '0012', '', '', '9999', 'By'),
  ('0101901234', 'K3', 'Vestergade', '007', '02', 'TV', '8000', 'Aarhus C'),
  ('0505801111', 'K5', 'Torvet', '2', '', '', '7100', 'Vejle');

insert into borger_dim (cpr, fornavn, mellemnavn, efternavn, gyldig_fra, gyldig_til)
values
  ('0101901234', 'Anna', 'Marie', 'Hansen', 20150601, 99991231),
  ('0101901234', 'Anna', 'Marie', 'Hansen', 20120101, 20150601),
  ('0101901234', 'Anna', null, 'Berg', 19900101, 20120101),
  ('0505801111', 'Bo', null, 'Jensen', 19800505, 99991231);
"#;

/// In-memory warehouse with the production schema and a small family.
pub fn seeded_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(include_str!("../../sql/schema.sql"))
        .unwrap();
    conn.execute_batch(SEED_SQL).unwrap();
    conn
}

/// File-backed warehouse seeded like `seeded_conn`, for code that opens
/// its own connections.
pub fn seeded_db(dir: &Path) -> Database {
    let db = Database::new(dir.join("warehouse.sqlite3"));
    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db.with_conn_mut(|conn| {
        conn.execute_batch(SEED_SQL)?;
        Ok(())
    })
    .unwrap();
    db
}

/// Builds a minimal .docx package whose body is `body_xml`.
pub fn docx_with_body(body_xml: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body_xml}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer.start_file("[Content_Types].xml", options).unwrap();
    writer
        .write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.start_file("word/footer1.xml", options).unwrap();
    writer
        .write_all(br#"<w:ftr><w:p><w:r><w:t>Sag {{case_number}}</w:t></w:r></w:p></w:ftr>"#)
        .unwrap();

    writer.finish().unwrap().into_inner()
}

/// Concatenated text of every `<w:t>` run in the rendered document body.
pub fn document_text(docx: &[u8]) -> String {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();

    let mut text = String::new();
    let mut rest = xml.as_str();
    while let Some(start) = rest.find("<w:t>") {
        rest = &rest[start + 5..];
        let end = rest.find("</w:t>").unwrap();
        text.push_str(&rest[..end]);
        text.push('|');
        rest = &rest[end..];
    }
    text
}
