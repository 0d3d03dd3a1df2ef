/// Fixed species → display-image table. The paths are resolved against the
/// template layer's static assets; unrecognized species get the default image.
const SPECIES_IMAGES: &[(&str, &str)] = &[
    ("Monstera", "images/monstera.png"),
    ("Pothos", "images/pothos.png"),
    ("Succulent", "images/suculenta.png"),
    ("Snake Plant", "images/sansevieria.png"),
];

pub const DEFAULT_IMAGE: &str = "images/default.png";

pub fn image_for(species: &str) -> &'static str {
    SPECIES_IMAGES
        .iter()
        .find(|(name, _)| *name == species)
        .map(|(_, image)| *image)
        .unwrap_or(DEFAULT_IMAGE)
}

/// The choices offered by the add/edit forms.
pub fn species_list() -> Vec<String> {
    SPECIES_IMAGES.iter().map(|(name, _)| (*name).to_string()).collect()
}
