//! Localized labels of the client dialog.

use common::model::params::UiStrings;

struct StringTable {
    open_in_amanote: &'static str,
    download_notes: &'static str,
    open_analytics: &'static str,
    open_podcast_creator: &'static str,
    teacher: &'static str,
}

const EN: StringTable = StringTable {
    open_in_amanote: "Open in Amanote",
    download_notes: "Download annotated file",
    open_analytics: "Open Learning Analytics",
    open_podcast_creator: "Open Podcast Creator",
    teacher: "Teacher",
};

const FR: StringTable = StringTable {
    open_in_amanote: "Ouvrir dans Amanote",
    download_notes: "Télécharger le fichier annoté",
    open_analytics: "Ouvrir Learning Analytics",
    open_podcast_creator: "Ouvrir Podcast Creator",
    teacher: "Professeur",
};

/// First two letters of a host language code, e.g. `fr` for `fr_ca`.
pub fn short_language(lang: &str) -> String {
    lang.chars().take(2).collect()
}

/// Labels for `lang`, English when the language has no table.
pub fn strings_for(lang: &str) -> UiStrings {
    let table = match short_language(lang).as_str() {
        "fr" => &FR,
        _ => &EN,
    };

    UiStrings {
        open_in_amanote: table.open_in_amanote.to_string(),
        download_notes: table.download_notes.to_string(),
        open_analytics: table.open_analytics.to_string(),
        open_podcast_creator: table.open_podcast_creator.to_string(),
        teacher: table.teacher.to_string(),
    }
}
