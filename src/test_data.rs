#[cfg(test)]
pub const POST_DATA: &str = "

---
title: Notes on tooling
draft: false
---
# Notes on tooling

Cargo workspaces keep things tidy #rust #cargo

## Formatting

* rustfmt settles the argument #rust
1. Run it before every commit #tips

```
# not a tag #rust
```

$$
x = #y
$$

## Formatting

> Clippy catches the rest #rust
";

#[cfg(test)]
pub const POST_NO_FRONTMATTER: &str = "

First line

Last line
";
