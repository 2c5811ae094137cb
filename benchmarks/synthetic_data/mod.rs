use bson::{Document, doc};
use fake::Fake;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::Words;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;
use std::io::Write;
use std::path::{Path, PathBuf};

const TOPICS: &[&str] = &["food", "travel", "fitness", "cars", "fashion", "music", "art", "chef", "gaming"];

fn or_placeholder<R: Rng>(rng: &mut R, v: String) -> String {
    if rng.random_bool(0.33) { "0".to_string() } else { v }
}

/// One scraped profile; roughly a third of the contact and profile fields carry the "0" placeholder.
pub fn lead<R: Rng>(rng: &mut R) -> Document {
    let mut words: Vec<String> = Words(3..8).fake_with_rng(rng);
    words.push(TOPICS[rng.random_range(0..TOPICS.len())].to_string());
    let desc = or_placeholder(rng, words.join(" "));
    let email: String = SafeEmail().fake_with_rng(rng);
    let email = or_placeholder(rng, email);
    let phone: String = PhoneNumber().fake_with_rng(rng);
    let phone = or_placeholder(rng, phone);
    let avatar = or_placeholder(rng, "https://cdn.example.com/a.jpg".to_string());
    let link = or_placeholder(rng, "https://example.com".to_string());
    let login: String = Username().fake_with_rng(rng);
    let name: String = Name().fake_with_rng(rng);
    let privacy = if rng.random_bool(0.2) { "private" } else { "public" };
    let post_cnt = rng.random_range(0..2_000_i64);
    let fol_cnt = rng.random_range(0..100_000_i64);
    doc! {
        "name": name,
        "desc": desc,
        "email": email,
        "phone": phone,
        "login": login,
        "post_cnt": post_cnt,
        "fol_cnt": fol_cnt,
        "link": link,
        "avatar": avatar,
        "privacy": privacy,
    }
}

pub fn generate(total: usize) -> Vec<Document> {
    let mut rng = rand::rng();
    (0..total).map(|_| lead(&mut rng)).collect()
}

/// Writes `total` leads as NDJSON to `path` unless the file already exists.
pub fn ensure_ndjson(path: &str, total: usize) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    if p.exists() {
        println!("File '{path}' already exists. Skipping generation.");
        return Ok(p.to_path_buf());
    }
    if let Some(dir) = p.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut out = std::io::BufWriter::new(std::fs::File::create(p)?);
    let mut rng = rand::rng();
    for i in 0..total {
        let json = bson::Bson::Document(lead(&mut rng)).into_relaxed_extjson();
        writeln!(out, "{json}")?;
        if (i + 1) % 100_000 == 0 {
            println!("Generated leads: {}/{}", i + 1, total);
        }
    }
    out.flush()?;
    Ok(p.to_path_buf())
}
