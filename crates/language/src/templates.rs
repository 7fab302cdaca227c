use crate::LanguageId;

const JAVASCRIPT: &str = r#"// JavaScript starter
function greet(name) {
  return `Hello, ${name}!`;
}

console.log(greet("World"));
"#;

const TYPESCRIPT: &str = r#"// TypeScript starter
function greet(name: string): string {
  return `Hello, ${name}!`;
}

console.log(greet("World"));
"#;

const PYTHON: &str = r#"# Python starter
def main():
    print("Hello, World!")


if __name__ == "__main__":
    main()
"#;

const CPP: &str = r#"// C++ starter
#include <iostream>
using namespace std;

int main() {
    cout << "Hello, World!" << endl;
    return 0;
}
"#;

const C: &str = r#"// C starter
#include <stdio.h>

int main(void) {
    printf("Hello, World!\n");
    return 0;
}
"#;

const HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Document</title>
</head>
<body>
    <h1>Hello, World!</h1>
</body>
</html>
"#;

const CSS: &str = r#"/* CSS starter */
body {
    font-family: sans-serif;
    margin: 0;
    padding: 20px;
}
"#;

const JAVA: &str = r#"// Java starter
public class Main {
    public static void main(String[] args) {
        System.out.println("Hello, World!");
    }
}
"#;

const PHP: &str = r#"<?php
// PHP starter
echo "Hello, World!";
?>
"#;

pub(crate) fn template(language: LanguageId) -> &'static str {
    match language {
        LanguageId::JavaScript => JAVASCRIPT,
        LanguageId::TypeScript => TYPESCRIPT,
        LanguageId::Python => PYTHON,
        LanguageId::Cpp => CPP,
        LanguageId::C => C,
        LanguageId::Html => HTML,
        LanguageId::Css => CSS,
        LanguageId::Java => JAVA,
        LanguageId::Php => PHP,
        LanguageId::Plaintext => "",
    }
}
