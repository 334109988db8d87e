mod collect;
mod directives;
mod plan;
mod testkit;
