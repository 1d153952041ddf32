pub mod host;

use crate::codegen::Generated;

/// Declared-type bookkeeping. Types collapse to four categories: number,
/// boolean, array and other.
pub const TYPE_SHIM: &str = r#"class EpoxyTypeError extends TypeError {
    constructor(message) {
        super(message);
        this.name = "EpoxyTypeError";
    }
}
const __epx_types = new Map();
function __epx_normalize(type) {
    switch (type) {
        case "int":
        case "double":
            return "number";
        case "bool":
            return "boolean";
        case "array":
            return "array";
        default:
            return "other";
    }
}
function __epx_category(value) {
    if (typeof value === "number") return "number";
    if (typeof value === "boolean") return "boolean";
    if (Array.isArray(value)) return "array";
    return "other";
}
function __epx_check(what, expected, value) {
    const actual = __epx_category(value);
    if (actual !== expected) {
        throw new EpoxyTypeError(`${what} expects ${expected} but got ${actual} (${JSON.stringify(value)})`);
    }
}
function __epx_register(name, type, ...value) {
    const expected = __epx_normalize(type);
    __epx_types.set(name, expected);
    if (value.length > 0) {
        __epx_check(`'${name}' declared as ${type}`, expected, value[0]);
    }
    return value[0];
}
function __epx_validate(name, value) {
    if (__epx_types.has(name)) {
        __epx_check(`'${name}'`, __epx_types.get(name), value);
    }
    return value;
}
function __epx_forget(name, value) {
    __epx_types.delete(name);
    return value;
}
function __epx_returns(fn, type, value) {
    __epx_check(`function '${fn}' returning ${type}`, __epx_normalize(type), value);
    return value;
}
"#;

/// Reads one line of stdin synchronously; JSON when it parses, raw text
/// otherwise.
pub const INPUT_ADAPTER: &str = r#"const __epx_input = (() => {
    const fs = require("fs");
    return () => {
        const bytes = [];
        const buffer = Buffer.alloc(1);
        for (;;) {
            let read = 0;
            try {
                read = fs.readSync(0, buffer, 0, 1, null);
            } catch (e) {
                if (e.code === "EAGAIN") continue;
                if (e.code === "EOF") break;
                throw e;
            }
            if (read === 0 || buffer[0] === 10) break;
            bytes.push(buffer[0]);
        }
        const line = Buffer.from(bytes).toString("utf8").replace(/\r$/, "");
        try {
            return JSON.parse(line);
        } catch (_) {
            return line;
        }
    };
})();
"#;

/// Final host text: requested preambles, then the program.
pub fn assemble(generated: &Generated) -> String {
    let mut script = String::new();
    if generated.features.type_shim {
        script.push_str(TYPE_SHIM);
    }
    if generated.features.input {
        script.push_str(INPUT_ADAPTER);
    }
    script.push_str(&generated.code);
    script.push('\n');
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Features;

    #[test]
    fn test_preambles_follow_features() {
        let bare = assemble(&Generated {
            code: "console.log(1);".to_string(),
            features: Features::default(),
        });
        assert_eq!(bare, "console.log(1);\n");

        let typed = assemble(&Generated {
            code: "let x = __epx_register(\"x\", \"int\", 1);".to_string(),
            features: Features {
                type_shim: true,
                input: false,
            },
        });
        assert!(typed.contains("function __epx_register"));
        assert!(typed.contains("function __epx_forget"));
        assert!(!typed.contains("__epx_input = "));

        let input = assemble(&Generated {
            code: "let x = __epx_input();".to_string(),
            features: Features {
                type_shim: false,
                input: true,
            },
        });
        assert!(input.contains("const __epx_input = "));
        assert!(!input.contains("EpoxyTypeError"));
    }
}
