use std::{cell::RefCell, fs, io::Write, path::Path, rc::Rc};

use mathpy::{
    error::{RuntimeError, SyntaxError},
    interpreter::{
        evaluator::{
            core::Interpreter,
            function::plot::{Plotter, TextPlotter},
        },
        value::core::Value,
    },
    run,
};
use walkdir::WalkDir;

/// An output sink the test keeps a handle to after the interpreter takes it.
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

type Figure = (Vec<f64>, Option<Vec<f64>>);

/// Records every figure handed to it.
#[derive(Clone, Default)]
struct RecordingPlotter {
    figures: Rc<RefCell<Vec<Figure>>>,
    shown:   Rc<RefCell<usize>>,
}

impl Plotter for RecordingPlotter {
    fn plot(&mut self, series: &[f64], other: Option<&[f64]>) -> Result<(), String> {
        self.figures.borrow_mut().push((series.to_vec(), other.map(<[f64]>::to_vec)));
        Ok(())
    }

    fn show(&mut self, _out: &mut dyn Write) -> Result<(), String> {
        *self.shown.borrow_mut() += 1;
        Ok(())
    }
}

struct Session {
    interpreter: Interpreter,
    out:         SharedBuffer,
    plotter:     RecordingPlotter,
}

impl Session {
    fn new() -> Self {
        let out = SharedBuffer::default();
        let plotter = RecordingPlotter::default();
        let interpreter = Interpreter::with_io(Box::new(out.clone()), Box::new(plotter.clone()));
        Self { interpreter,
               out,
               plotter }
    }

    fn run(&mut self, src: &str) -> Result<(), Box<dyn std::error::Error>> {
        run(src, &mut self.interpreter)
    }
}

/// Runs a script and returns everything it printed.
fn output_of(src: &str) -> String {
    let mut session = Session::new();
    if let Err(e) = session.run(src) {
        panic!("Script failed: {e}\n{src}");
    }
    session.out.contents()
}

fn assert_success(src: &str) {
    let mut session = Session::new();
    if let Err(e) = session.run(src) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn assert_failure(src: &str) {
    let mut session = Session::new();
    if session.run(src).is_ok() {
        panic!("Script succeeded but was expected to fail:\n{src}")
    }
}

fn runtime_error(src: &str) -> RuntimeError {
    let mut session = Session::new();
    let err = session.run(src).expect_err("script should fail");
    match err.downcast::<RuntimeError>() {
        Ok(e) => *e,
        Err(other) => panic!("expected a runtime error, got: {other}"),
    }
}

#[test]
fn integral_results_print_without_a_fraction() {
    assert_eq!(output_of("print(4 / 2)\n"), "2\n");
    assert_eq!(output_of("print(1 / 2)\n"), "0.5\n");
    assert_eq!(output_of("print(2.5 * 2)\n"), "5\n");
    assert_eq!(output_of("print(2.0)\n"), "2.0\n");
    assert_eq!(output_of("print(sqrt(4))\n"), "2.0\n");
    assert_eq!(output_of("print(2 ^ -1)\n"), "0.5\n");
}

#[test]
fn logical_operators_evaluate_both_sides() {
    let src = "def noisy(v):\n  print(\"called\")\n  return v\nend\n\
               a = False and noisy(True)\n\
               b = True or noisy(False)\n\
               print(a, b)\n";
    assert_eq!(output_of(src), "called\ncalled\nFalse True\n");
}

#[test]
fn matrix_product_differs_from_elementwise_product() {
    let src = "a = [[1, 2], [3, 4]]\nb = [[5, 6], [7, 8]]\nprint(a * b)\nprint(a .* b)\n";
    assert_eq!(output_of(src), "[[19 22]\n [43 50]]\n[[ 5 12]\n [21 32]]\n");
}

#[test]
fn elementwise_operators_broadcast() {
    assert_eq!(output_of("print([1, 2, 3] + 1)\n"), "[2 3 4]\n");
    assert_eq!(output_of("print([[1, 2], [3, 4]] .- [1, 2])\n"), "[[0 0]\n [2 2]]\n");
    assert_eq!(output_of("print(2 * [1, 2])\n"), "[2 4]\n");
    assert_eq!(output_of("print([1, 2] * [3, 4])\n"), "11\n");
    assert_failure("x = [1, 2] + [1, 2, 3]\n");
}

#[test]
fn set_literals_deduplicate_and_combine() {
    assert_eq!(output_of("print({1, 1, 2})\n"), "{1, 2}\n");
    assert_eq!(output_of("print({1, 2} & {2, 3})\n"), "{2}\n");
    assert_eq!(output_of("print({1, 2} | {2, 3})\n"), "{1, 2, 3}\n");
    assert_eq!(output_of("print({1, 2} - {2, 3})\n"), "{1}\n");
    assert_eq!(output_of("print({1} - {1})\n"), "set()\n");
    assert_failure("x = {1, 2} + {3}\n");
    assert_failure("x = {1} == {1}\n");
    assert!(matches!(runtime_error("x = {1} < {1, 2}\n"),
                     RuntimeError::UnsupportedOperator { line: 1, .. }));
    assert_failure("x = {[1, 2]}\n");
}

#[test]
fn functions_resolve_free_names_in_the_caller() {
    let src = "def show():\n  print(v)\nend\n\
               def outer():\n  v = 2\n  show()\nend\n\
               v = 1\nshow()\nouter()\nshow()\n";
    assert_eq!(output_of(src), "1\n2\n1\n");
}

#[test]
fn range_forms() {
    assert_eq!(output_of("for x in range(3): print(x) end\n"), "0\n1\n2\n");
    assert_eq!(output_of("print(range(1, 4))\n"), "[1 2 3]\n");
    assert_eq!(output_of("print(range(0, 10, 2))\n"), "[0 2 4 6 8]\n");
    assert!(matches!(runtime_error("x = range()\n"),
                     RuntimeError::ArgumentCountMismatch { found: 0, .. }));
}

#[test]
fn float_indices_behave_like_integer_indices() {
    let src = "a = [10, 20, 30]\nprint(a[2.0], a[2], a[-1], a[1.9])\n";
    assert_eq!(output_of(src), "30 30 30 20\n");

    let err = runtime_error("a = [1, 2]\nx = a[5]\n");
    assert!(matches!(err, RuntimeError::Subscript { line: 2, .. }));
    assert_eq!(err.to_string(),
               "Error on line 2: Subscript error: Index 5 is out of bounds for axis with size 2.");
}

#[test]
fn float_arrays_print_and_read_as_floats() {
    assert_eq!(output_of("print(zeros(3)[0], [1.0, 2.5][0], ones(2)[1])\n"), "0.0 1.0 1.0\n");
    assert_eq!(output_of("print([1, 2] / 2, [1.0, 2.0])\n"), "[0.5 1. ] [1. 2.]\n");
    assert_eq!(output_of("for x in linspace(0, 1, 2): print(x) end\n"), "0.0\n1.0\n");

    // Arithmetic still collapses integral results to integers.
    assert_eq!(output_of("print(zeros(3)[0] + 1, [1.0, 2.0] * [1.0, 1.0])\n"), "1 3\n");
    assert_eq!(output_of("print(range(3)[1], [1, 2] + 1)\n"), "1 [2 3]\n");
}

#[test]
fn slices_and_multi_axis_subscripts() {
    let src = "m = [[1, 2, 3], [4, 5, 6]]\nprint(m[1, 2])\nprint(m[:, 0])\nprint(m[0][1:])\n\
               s = \"hello\"\nprint(s[1:3], s[-1])\n";
    assert_eq!(output_of(src), "6\n[1 4]\n[2 3]\nel o\n");
}

#[test]
fn precedence_matches_evaluation_order() {
    assert_eq!(output_of("print(1 + 2 * 3)\n"), "7\n");
    assert_eq!(output_of("print(2 ^ 3 ^ 2)\n"), "512\n");
    assert_eq!(output_of("print(-2 ^ 2)\n"), "-4\n");
    assert_eq!(output_of("print((1 + 2) * 3)\n"), "9\n");
    assert_eq!(output_of("print(1 < 2 and 3 > 4 or not False)\n"), "True\n");
}

#[test]
fn undefined_names_fail_without_partial_output() {
    let mut session = Session::new();
    let err = session.run("print(undefined_var)\n").expect_err("script should fail");
    assert!(matches!(err.downcast_ref::<RuntimeError>(),
                     Some(RuntimeError::UndefinedName { name, line: 1 }) if name == "undefined_var"));
    assert_eq!(session.out.contents(), "");
}

#[test]
fn syntax_errors_prevent_any_execution() {
    let mut session = Session::new();
    let err = session.run("print(1)\nx = (2\n").expect_err("script should fail");
    assert!(err.downcast_ref::<SyntaxError>().is_some());
    assert_eq!(session.out.contents(), "");
}

#[test]
fn control_flow() {
    let src = "n = 0\ntotal = 0\nwhile n < 5:\n  n = n + 1\n  if n == 3:\n    total = total + 100\n  \
               else:\n    total = total + n\n  end\nend\nprint(total)\n";
    assert_eq!(output_of(src), "112\n");

    let src = "def fact(n):\n  if n <= 1: return 1 end\n  return n * fact(n - 1)\nend\nprint(fact(10))\n";
    assert_eq!(output_of(src), "3628800\n");

    assert_eq!(output_of("for c in \"ab\": print(c) end\n"), "a\nb\n");
    assert_eq!(output_of("for e in {3, 1, 2}: print(e) end\n"), "1\n2\n3\n");
    assert_eq!(output_of("for row in [[1, 2], [3, 4]]: print(row) end\n"), "[1 2]\n[3 4]\n");
}

#[test]
fn functions_return_none_without_return() {
    assert_eq!(output_of("def f(): x = 1 end\nprint(f())\n"), "None\n");
    assert_eq!(output_of("def f(a, b): return a end\nprint(f(1, 2, 3))\n"), "1\n");
    assert!(matches!(runtime_error("def f(a, b): return b end\nx = f(1)\n"),
                     RuntimeError::UndefinedName { .. }));
}

#[test]
fn truthiness_of_arrays() {
    assert_eq!(output_of("if [1]: print(\"yes\") end\n"), "yes\n");
    assert_eq!(output_of("if []: print(\"yes\") else: print(\"no\") end\n"), "no\n");
    assert!(matches!(runtime_error("if [1, 2]: x = 1 end\n"), RuntimeError::AmbiguousTruth { .. }));
}

#[test]
fn runtime_errors_carry_their_line() {
    assert!(matches!(runtime_error("x = 1\ny = x / 0\n"),
                     RuntimeError::DivisionByZero { line: 2 }));
    assert!(matches!(runtime_error("x = 9223372036854775807 + 1\n"),
                     RuntimeError::Overflow { line: 1 }));
    assert!(matches!(runtime_error("x = 1\nx(2)\n"), RuntimeError::NotCallable { line: 2, .. }));
    assert!(matches!(runtime_error("for i in 5: x = i end\n"),
                     RuntimeError::NotIterable { line: 1, .. }));
    assert!(matches!(runtime_error("return 1\n"), RuntimeError::ReturnOutsideFunction { line: 1 }));
    assert!(matches!(runtime_error("x = \"a\" - 1\n"),
                     RuntimeError::UnsupportedOperator { line: 1, .. }));
    assert!(matches!(runtime_error("x = inv([[1, 2], [2, 4]])\n"),
                     RuntimeError::LinearAlgebra { line: 1, .. }));
}

#[test]
fn oversized_arrays_fail_instead_of_overflowing() {
    assert!(matches!(runtime_error("x = zeros(100000, 100000, 100000, 100000)\n"),
                     RuntimeError::InvalidArgument { line: 1, .. }));
    assert!(matches!(runtime_error("x = 1\ny = ones(4294967296, 4294967296)\n"),
                     RuntimeError::InvalidArgument { line: 2, .. }));
    assert!(matches!(runtime_error("x = range(0, 9000000000000000000)\n"),
                     RuntimeError::InvalidArgument { line: 1, .. }));
    assert!(matches!(runtime_error("x = linspace(0, 1, 1000000000000)\n"),
                     RuntimeError::InvalidArgument { line: 1, .. }));
}

#[test]
fn builtin_library() {
    assert_eq!(output_of("print(mean([1, 2, 3, 4]), median([3, 1, 2]), std([1, 1]))\n"),
               "2.5 2.0 0.0\n");
    assert_eq!(output_of("print(abs(-3), round(2.5), round(3.14159, 2))\n"), "3 2.0 3.14\n");
    assert_eq!(output_of("print(det([[2, 1], [4, 3]]))\n"), "2.0\n");
    assert_eq!(output_of("print(inv([[2, 0], [0, 4]]))\n"), "[[0.5  0.  ]\n [0.   0.25]]\n");
    assert_eq!(output_of("print(zeros(2, 2))\n"), "[[0. 0.]\n [0. 0.]]\n");
    assert_eq!(output_of("print(linspace(0, 1, 3))\n"), "[0.  0.5 1. ]\n");
    assert_eq!(output_of("print(\"a\" + \"b\", True, pi > 3)\n"), "ab True True\n");
    assert_eq!(output_of("print(\"ab\" * 2, 3 * \"-\", \"x\" * 0)\n"), "abab --- \n");
    assert_failure("x = \"ab\" * 1.5\n");
    assert_eq!(output_of("print(sqrt)\n"), "<built-in function sqrt>\n");
}

#[test]
fn eig_returns_values_and_vectors() {
    let mut session = Session::new();
    session.run("r = eig([[2, 0], [0, 1]])\nvalues = r[0]\nvectors = r[1]\n")
           .expect("eig should succeed");

    assert_eq!(session.interpreter.global("values").unwrap().to_string(), "[1. 2.]");
    let Some(Value::Array(vectors)) = session.interpreter.global("vectors") else {
        panic!("expected an array of eigenvectors");
    };
    assert_eq!(vectors.shape(), &[2, 2]);
    assert_eq!(vectors.data(), &[0.0, 1.0, 1.0, 0.0]);
}

#[test]
fn plot_hands_series_to_the_plotter() {
    let mut session = Session::new();
    session.run("plot([1, 2, 3])\nplot(range(2), [5, 6])\nx = plot(1)\n")
           .expect("plot should succeed");

    let figures = session.plotter.figures.borrow();
    assert_eq!(figures.len(), 3);
    assert_eq!(figures[0], (vec![1.0, 2.0, 3.0], None));
    assert_eq!(figures[1], (vec![0.0, 1.0], Some(vec![5.0, 6.0])));
    assert_eq!(*session.plotter.shown.borrow(), 3);
    assert_eq!(session.interpreter.global("x"), Some(Value::None));

    assert!(matches!(runtime_error("plot()\n"), RuntimeError::ArgumentCountMismatch { .. }));
    assert!(matches!(runtime_error("plot(\"a\")\n"), RuntimeError::TypeError { .. }));
}

#[test]
fn text_plots_go_to_the_interpreter_output() {
    let out = SharedBuffer::default();
    let mut interpreter = Interpreter::with_io(Box::new(out.clone()),
                                               Box::new(TextPlotter::new(20, 5)));
    run("print(\"before\")\nplot([1, 2, 3])\nprint(\"after\")\n", &mut interpreter)
        .expect("plot should succeed");

    let text = out.contents();
    assert!(text.starts_with("before\n"));
    assert!(text.ends_with("after\n"));
    assert_eq!(text.matches('*').count(), 3);
}

#[test]
fn semicolons_are_optional_between_statements() {
    assert_eq!(output_of("a = 1; b = 2; print(a + b);\n;\n"), "3\n");
    assert_eq!(output_of("a = 1 b = 2 print(a + b)\n"), "3\n");
    assert_eq!(output_of("while 0: x = 1 end print(3)\n"), "3\n");
}

#[test]
fn globals_survive_between_runs() {
    let mut session = Session::new();
    session.run("x = 41\n").expect("first run");
    session.run("x = x + 1\n").expect("second run");
    assert_eq!(session.interpreter.global("x"), Some(Value::Integer(42)));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    assert_success("# a comment\n\n\nx = 1 # trailing\n\n");
}

/// Runs a script the way the CLI does and renders its result as text.
///
/// A failing script renders as `Error: {message}`.
fn script_output(code: &str) -> String {
    let mut session = Session::new();
    match session.run(code) {
        Ok(()) => session.out.contents(),
        Err(e) => format!("Error: {e}"),
    }
}

#[test]
fn script_examples_match_expected_output() {
    let mut count = 0;

    for entry in WalkDir::new("tests/scripts").into_iter()
                                              .filter_map(Result::ok)
                                              .filter(|e| e.path().extension().is_some_and(|ext| ext == "mpy"))
    {
        let path = entry.path();
        let code = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected_path = path.with_extension("txt");
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                                                             panic!("Failed to read {}: {e}",
                                                                    display(&expected_path))
                                                         });

        count += 1;
        assert_eq!(script_output(&code).trim(),
                   expected.trim(),
                   "script {} produced unexpected output",
                   display(path));
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
