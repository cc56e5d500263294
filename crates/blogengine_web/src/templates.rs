//! Page templates compiled into the binary.

use tera::Tera;

pub(crate) const NOT_FOUND_PAGE: &str = include_str!("../templates/not_found.html");

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("listing.html", include_str!("../templates/listing.html")),
    ("post.html", include_str!("../templates/post.html")),
];

pub(crate) fn load() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    Ok(tera)
}
