use crate::{
    parser::prelude::{parse_module, ParseError},
    transpiler::prelude::{transpile, Mapping, Position, SourceMap, TranspileOptions}
};

fn to_js(src: &str) -> Result<String, ParseError> {
    let module = parse_module(src)?;

    Ok(transpile(&module.program, &TranspileOptions::default()).code)
}

fn mapping(generated: (u32, u32), original: (u32, u32)) -> Mapping {
    Mapping {
        generated: Position { line: generated.0, column: generated.1 },
        original: Position { line: original.0, column: original.1 }
    }
}

#[test]
fn test_declaration() -> Result<(), ParseError> {
    assert_eq!(to_js("khalli x = 5;")?, "let x = 5;");
    assert_eq!(to_js("thabit name = \"Sara\";")?, "const name = \"Sara\";");
    assert_eq!(to_js("khalli empty;")?, "let empty;");

    Ok(())
}

#[test]
fn test_top_level_statements_are_separated() -> Result<(), ParseError> {
    assert_eq!(
        to_js("khalli x = 1 + 2; gool(x); jeeb(\"/api\");")?,
        "let x = 1 + 2;\n\nconsole.log(x);\n\nfetch(\"/api\");"
    );

    Ok(())
}

#[test]
fn test_functions_and_else_if_chains() -> Result<(), ParseError> {
    let src = r#"
        arrifli sign(n) {
            iza (n > 0) { raje3li 1; } willa iza (n < 0) { raje3li 0 - 1; } willa { raje3li 0; }
        }
    "#;

    let expected = [
        "function sign(n) {",
        "  if (n > 0) {",
        "    return 1;",
        "  } else if (n < 0) {",
        "    return 0 - 1;",
        "  } else {",
        "    return 0;",
        "  }",
        "}"
    ].join("\n");

    assert_eq!(to_js(src)?, expected);

    Ok(())
}

#[test]
fn test_loops_and_exceptions() -> Result<(), ParseError> {
    let src = r#"
        la (khalli i = 0; i < 3; i = i + 1) { iza (i == 1) { kammil; } gool(i); iksir; }
        hawel { irmi "bad"; } law_sar_ma_sar (e) { gool(e); }
        hawel { } law_sar_ma_sar { raje3li; }
    "#;

    let expected = [
        "for (let i = 0; i < 3; i = i + 1) {",
        "  if (i == 1) {",
        "    continue;",
        "  }",
        "  console.log(i);",
        "  break;",
        "}",
        "",
        "try {",
        "  throw \"bad\";",
        "} catch (e) {",
        "  console.log(e);",
        "}",
        "",
        "try {",
        "} catch (error) {",
        "  return;",
        "}"
    ].join("\n");

    assert_eq!(to_js(src)?, expected);

    Ok(())
}

#[test]
fn test_expression_forms() -> Result<(), ParseError> {
    assert_eq!(
        to_js("khalli y = (1 + 2) * 3 - (4 - 5);")?,
        "let y = (1 + 2) * 3 - (4 - 5);"
    );
    assert_eq!(
        to_js("items.filter(x => x > 1).map((x, i) => x * i)[0].name;")?,
        "items.filter((x) => x > 1).map((x, i) => x * i)[0].name;"
    );
    assert_eq!(
        to_js(r#"khalli o = { name: "x", "full name": 1, tags: [1, 2] }; gool(o["full name"]);"#)?,
        "let o = { name: \"x\", \"full name\": 1, tags: [1, 2] };\n\nconsole.log(o[\"full name\"]);"
    );
    assert_eq!(to_js("{ a: 1 };")?, "({ a: 1 });");
    assert_eq!(to_js("khalli make = () => { };")?, "let make = () => {};");
    assert_eq!(to_js("ok = a + b < c * d;")?, "ok = a + b < c * d;");

    Ok(())
}

#[test]
fn test_shared_precedence_levels_keep_grouping() -> Result<(), ParseError> {
    assert_eq!(to_js("khalli r = a || b && c;")?, "let r = (a || b) && c;");
    assert_eq!(to_js("khalli r = a && b || c;")?, "let r = (a && b) || c;");
    assert_eq!(to_js("khalli r = a || (b && c);")?, "let r = a || (b && c);");
    assert_eq!(to_js("khalli r = a || b || c;")?, "let r = a || b || c;");
    assert_eq!(to_js("khalli r = a == b < c;")?, "let r = (a == b) < c;");
    assert_eq!(to_js("khalli r = a < b == c;")?, "let r = (a < b) == c;");
    assert_eq!(to_js("khalli r = a < b < c;")?, "let r = a < b < c;");

    Ok(())
}

#[test]
fn test_strings_are_escaped() -> Result<(), ParseError> {
    assert_eq!(to_js(r#"gool("say \"hi\"");"#)?, r#"console.log("say \"hi\"");"#);

    Ok(())
}

#[test]
fn test_block_arrows_are_reindented() -> Result<(), ParseError> {
    let src = r#"
        thabit double = (x) => { raje3li x * 2; };
        arrifli outer() { raje3li (x) => { gool(x); raje3li x; }; }
    "#;

    let expected = [
        "const double = (x) => {",
        "  return x * 2;",
        "};",
        "",
        "function outer() {",
        "  return (x) => {",
        "    console.log(x);",
        "    return x;",
        "  };",
        "}"
    ].join("\n");

    assert_eq!(to_js(src)?, expected);

    Ok(())
}

#[test]
fn test_async_forms() -> Result<(), ParseError> {
    let src = r#"
        tazamonan arrifli load(url) { khalli r = stanna jeeb(url); raje3li r; }
        khalli wrapped = tazamonan (a) => a + 1;
        khalli later = tazamonan 5;
    "#;

    let expected = [
        "async function load(url) {",
        "  let r = await fetch(url);",
        "  return r;",
        "}",
        "",
        "let wrapped = async (a) => a + 1;",
        "",
        "let later = (async () => 5)();"
    ].join("\n");

    assert_eq!(to_js(src)?, expected);

    Ok(())
}

#[test]
fn test_source_map_positions() -> Result<(), ParseError> {
    let module = parse_module("khalli x = 1;\narrifli f() {\n  raje3li x;\n}\ngool(f());")?;

    let options = TranspileOptions {
        source_map: true,
        source_name: "demo.ta5bees".to_string()
    };

    let transpiled = transpile(&module.program, &options);

    assert_eq!(
        transpiled.code,
        "let x = 1;\n\nfunction f() {\n  return x;\n}\n\nconsole.log(f());"
    );

    let map = transpiled.source_map.expect("source map requested");

    assert_eq!(map.sources, vec!["demo.ta5bees".to_string()]);
    assert_eq!(map.mappings, vec![
        mapping((1, 0), (1, 0)),
        mapping((3, 0), (2, 0)),
        mapping((4, 2), (3, 2)),
        mapping((7, 0), (5, 0))
    ]);

    Ok(())
}

#[test]
fn test_source_map_json() {
    let map = SourceMap::new("main.ta5bees", vec![mapping((1, 0), (1, 0))]);

    assert_eq!(
        map.to_json().unwrap(),
        r#"{"version":1,"sources":["main.ta5bees"],"mappings":[{"generated":{"line":1,"column":0},"original":{"line":1,"column":0}}]}"#
    );
}

#[test]
fn test_source_map_is_optional() -> Result<(), ParseError> {
    let module = parse_module("gool(1);")?;

    assert_eq!(transpile(&module.program, &TranspileOptions::default()).source_map, None);

    Ok(())
}
