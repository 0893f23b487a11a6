/*!

This is the long-form manual for `duty_roster` and `dutyfair`.

## What is measured

A duty roster (a "boletim") lists, for each day, who covers each duty post.
`dutyfair` reads a folder of rosters and answers one question: is every
person assigned to each post as often as the others?

For each post, the *opportunity count* is the number of distinct days on which
the post appears in the rosters. For each person and each post, the report
shows `assignments / opportunities (ratio%)`.

## Input format

The text of a document is cut into periods at every date heading:

```text
PARA O DIA 5 DE MARÇO DE 2024 (TERÇA-FEIRA)
```

Inside a period, an assignment is a line containing a known post name, a colon,
the name of the person, a dash and a company code:

```text
Policial de Dia à Gu CG: 2º SGT INF JOÃO SILVA - 1ª CIA
```

All the other lines (headers, footers, other sections) are ignored. A document
without any date heading appears once in the raw table with `N/A` values and
does not count in the analysis. A month that is not recognized is written
`XX` in the date.

## Names

The same person may be listed with different ranks over time. Before counting,
rank and unit abbreviations (`2º SGT`, `INF`, `TEN CEL`, ...) are removed from
the names. `1º SGT INF JOÃO SILVA` and `2º SGT INF JOÃO SILVA` are counted
together, under the first name encountered. Documents are processed in
the order of their file names.

## Vocabulary

The post names and the rank abbreviations are configuration. The builtin
tables cover the Campo Grande garrison rosters; other tables can be given to
the library:

```
use duty_roster::{PostAlias, Vocabulary, VocabularyTables};

let tables = VocabularyTables {
    posts: vec![PostAlias {
        alias: "Sentinela do Portão".to_string(),
        name: "Sentinela".to_string(),
    }],
    rank_tokens: vec!["SD".to_string(), "CB".to_string()],
};
let vocab = Vocabulary::compile(&tables)?;
assert_eq!(vocab.normalize("SD MARIA LIMA"), "MARIA LIMA");
assert_eq!(vocab.canonical_post("Sentinela do Portão"), Some("Sentinela"));
# Ok::<(), duty_roster::AnalysisErrors>(())
```

or to the command line through the `posts` and `rankTokens` fields of the
configuration file.

## Ordering

People are sorted by decreasing number of assignments, then by name. The
per-post entries of one person are sorted by their rendered text by default
(`renderedString`), which is the historical behaviour of the report. The
`postName` order sorts them by post name instead.

*/
