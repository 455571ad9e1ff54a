use curata::{
    recommend_from_tables, recommend_personalized_from_tables, PersonalizedOptions,
    PersonalizedOutcome, Preferences, RecommendOptions, Table,
};

fn main() {
    // build a small in-memory catalog
    let mut catalog = Table::new(&["id", "titulo", "tipo", "genero", "tags"]);
    catalog.push_row(vec!["1", "Duna", "filme", "Sci-Fi", "deserto; especiaria"]);
    catalog.push_row(vec!["2", "Solaris", "filme", "Sci-Fi", "espaco; memoria"]);
    catalog.push_row(vec!["3", "O Hobbit", "livro", "Fantasia", "jornada; dragao"]);
    catalog.push_row(vec!["4", "Heat", "filme", "Policial", "assalto; noir"]);

    // content mode: explicit preferences
    let prefs = Preferences {
        kind: "filme".to_string(),
        genre: "Sci-Fi".to_string(),
        ..Preferences::default()
    };
    let recs = recommend_from_tables(&prefs, &catalog, None, None, &RecommendOptions::default())
        .expect("catalog is non-empty");
    println!("content mode:");
    for rec in &recs {
        println!("  {} - {} ({})", rec.item.id, rec.item.title, rec.explanation);
    }

    // personalized mode: seeded from liked items
    let mut feedback = Table::new(&["id", "titulo", "feedback"]);
    feedback.push_row(vec!["1", "Duna", "curtiu"]);
    let outcome = recommend_personalized_from_tables(
        Some(&catalog),
        Some(&feedback),
        None,
        &PersonalizedOptions::default(),
    );
    println!("personalized mode:");
    match outcome {
        PersonalizedOutcome::Ranked(recs) => {
            for rec in &recs {
                println!("  {} - {} ({})", rec.item.id, rec.item.title, rec.explanation);
            }
        }
        PersonalizedOutcome::Skipped(reason) => println!("  skipped: {reason}"),
    }
}
