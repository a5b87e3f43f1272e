/*!

This is the long-form manual for `sankey_flow` and `sgcharts`.

## Pipeline

Both charts follow the same shape: a data file is loaded and parsed into an
in-memory record list, the list is reduced into chart-ready values, and the
result is handed to an external rendering collaborator (a Sankey layout for
the candidates chart, a line chart for the parliamentary-seats chart). This
crate covers the middle step only; it never computes pixels or geometry.

The record list is recomputed into a fresh graph on every call. At tens to
low hundreds of rows there is nothing to gain from incremental updates, and
a full rebuild cannot go stale.

## Candidates chart

The input is a JSON array of candidate objects. Only two fields are read:

```json
[
  { "name": "...", "party": "PAP", "gender": "F" },
  { "name": "...", "party": "WP", "gender": "M" }
]
```

[crate::run_flow_stats] reduces the rows to a bipartite flow graph: one node
per party (first-seen order), one node per gender with at least one
candidate, and one weighted edge per observed party/gender pair. Party codes
outside the built-in palette keep a generic fallback color; they are never
rejected.

The gender side is then emphasized: both sides initially sum to the number
of records, which makes two big gender nodes dominate ten small party nodes
in a proportional rendering. The values on the gender side (nodes and all
edges pointing into it) are multiplied so that the gender total becomes
[crate::FlowRules::side_emphasis] times the party total. The step runs
exactly once per build; [crate::ScaledFlowGraph] has no rescaling operation,
so it cannot be applied twice.

## Seats chart

The input is a JSON array of country objects keyed by year strings:

```json
[
  { "Country Name": "Singapore", "Country Code": "SGP",
    "1990": 4.9, "1991": null, "2019": 23.0 }
]
```

Years with a missing or non-numeric value are skipped. Countries with fewer
than [crate::series::SeriesRules::min_points] defined observations are
dropped, the rest are ranked by their value in the reference year
(descending; ties keep input order), and the focus country's 1-based rank
and net change (last minus first observation) feed the chart copy.

## Undefined results

A quotient with a zero denominator (share of an empty record list, change of
an empty series) is `None`, never a NaN: the caller renders "N/A".

*/
