use num_integer::Integer;

pub struct Data {
    text: &'static str,
    exec_fn: fn(Vec<i64>) -> Vec<i64>,
}

impl Data {
    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn exec(&self, mut input: Vec<i64>) -> Vec<i64> {
        input.reverse();
        (self.exec_fn)(input)
    }
}

fn do_div(a: i64, b: i64) -> i64 {
    Integer::div_floor(&a, &b)
}

fn do_mod(a: i64, b: i64) -> i64 {
    Integer::mod_floor(&a, &b)
}

const FACTORIAL_TEXT: &str = r#"
    var n, f;
    procedure fact;
        var m;
    begin
        m := n;
        if m > 1 then
        begin
            n := n - 1;
            call fact
        end;
        f := f * m
    end;
    begin
        ?n;
        f := 1;
        call fact;
        !f
    end.
"#;

pub const FACTORIAL_DATA: Data = Data {
    text: FACTORIAL_TEXT,
    exec_fn: |mut input| {
        let n = input.pop().expect("invalid input");
        let f = (1..=n.max(1)).product::<i64>();

        assert!(input.is_empty());
        vec![if n < 1 { 0 } else { f }]
    },
};

const FIB_TEXT: &str = r#"
    VAR n, a, b, t;
    BEGIN
        ?n;
        a := 0;
        b := 1;
        WHILE n > 0 DO
        BEGIN
            !a;
            t := a + b;
            a := b;
            b := t;
            n := n - 1
        END
    END.
"#;

pub const FIB_DATA: Data = Data {
    text: FIB_TEXT,
    exec_fn: |mut input| {
        let mut output = vec![];

        let mut n = input.pop().expect("invalid input");
        let (mut a, mut b) = (0i64, 1i64);
        while n > 0 {
            output.push(a);
            let t = a + b;
            a = b;
            b = t;
            n -= 1;
        }

        assert!(input.is_empty());
        output
    },
};

const GCD_TEXT: &str = r#"
    var a, b;
    procedure gcd;
        var r;
    begin
        while b # 0 do
        begin
            r := a - a / b * b;
            a := b;
            b := r
        end
    end;
    begin
        ?a;
        ?b;
        call gcd;
        !a
    end.
"#;

pub const GCD_DATA: Data = Data {
    text: GCD_TEXT,
    exec_fn: |mut input| {
        let mut a = input.pop().expect("invalid input");
        let mut b = input.pop().expect("invalid input");

        while b != 0 {
            let r = do_mod(a, b);
            a = b;
            b = r;
        }

        assert!(input.is_empty());
        vec![a]
    },
};

const PRIMES_TEXT: &str = r#"
    const limit = 100;
    var n, candidate, prime;
    procedure check;
        var d;
    begin
        prime := 1;
        d := 2;
        while d * d <= candidate do
        begin
            if candidate / d * d = candidate then prime := 0;
            d := d + 1
        end
    end;
    begin
        ?n;
        if n > limit then n := limit;
        candidate := 2;
        while candidate <= n do
        begin
            call check;
            if prime = 1 then !candidate;
            candidate := candidate + 1
        end
    end.
"#;

pub const PRIMES_DATA: Data = Data {
    text: PRIMES_TEXT,
    exec_fn: |mut input| {
        let n = input.pop().expect("invalid input").min(100);
        let output: Vec<i64> = (2..=n)
            .filter(|&candidate| (2..).take_while(|d| d * d <= candidate).all(|d| candidate % d != 0))
            .collect();

        assert!(input.is_empty());
        output
    },
};

const BITSTRING_TEXT: &str = r#"
    var a, b;
    begin
        ?a;
        if a >= 0 then
            while a > 0 do
            begin
                b := a / 2 * 2;
                !a - b;
                a := a / 2
            end
    end.
"#;

pub const BITSTRING_DATA: Data = Data {
    text: BITSTRING_TEXT,
    exec_fn: |mut input| {
        let mut output = vec![];

        let mut a = input.pop().expect("invalid input");
        if a >= 0 {
            while a > 0 {
                output.push(a & 1);
                a = do_div(a, 2);
            }
        }

        assert!(input.is_empty());
        output
    },
};

const DIV_MOD_TEXT: &str = r#"
    var a, b;
    begin
        ?a;
        ?b;
        while b # 0 do
        begin
            !a / b;
            !a - a / b * b;
            ?a;
            ?b
        end
    end.
"#;

pub const DIV_MOD_DATA: Data = Data {
    text: DIV_MOD_TEXT,
    exec_fn: |mut input| {
        let mut output = vec![];

        let mut a = input.pop().expect("invalid input");
        let mut b = input.pop().expect("invalid input");
        while b != 0 {
            output.push(do_div(a, b));
            output.push(do_mod(a, b));
            a = input.pop().expect("invalid input");
            b = input.pop().expect("invalid input");
        }

        assert!(input.is_empty());
        output
    },
};

const NUMBERS_TEXT: &str = r#"
    var x;
    begin
        ?x;
        !x;
        !-x;
        !+x * 2;
        if odd x then !1;
        if x < 0 then !-1;
        if x = 0 then !0;
        if x > 0 then !1;
        if x <= 3 then !(x + 3) / 2;
        if x # 3 then !x / 3
    end.
"#;

pub const NUMBERS_DATA: Data = Data {
    text: NUMBERS_TEXT,
    exec_fn: |mut input| {
        let mut output = vec![];

        let x = input.pop().expect("invalid input");
        output.push(x);
        output.push(-x);
        output.push(x * 2);
        if x % 2 != 0 {
            output.push(1);
        }
        output.push(x.signum());
        if x <= 3 {
            output.push(do_div(x + 3, 2));
        }
        if x != 3 {
            output.push(do_div(x, 3));
        }

        assert!(input.is_empty());
        output
    },
};

const NESTING_TEXT: &str = r#"
    var total, depth;
    procedure outer;
        var step;
        procedure inner;
            var count;
        begin
            count := step;
            total := total + count * depth;
            step := step - 1;
            if step > 0 then call inner;
            !count
        end;
    begin
        step := depth;
        call inner;
        depth := depth - 1;
        if depth > 0 then call outer
    end;
    begin
        ?depth;
        total := 0;
        call outer;
        !total
    end.
"#;

pub const NESTING_DATA: Data = Data {
    text: NESTING_TEXT,
    exec_fn: |mut input| {
        struct Globals {
            total: i64,
            depth: i64,
            output: Vec<i64>,
        }

        fn inner(globals: &mut Globals, step: &mut i64) {
            let count = *step;
            globals.total += count * globals.depth;
            *step -= 1;
            if *step > 0 {
                inner(globals, step);
            }
            globals.output.push(count);
        }

        fn outer(globals: &mut Globals) {
            let mut step = globals.depth;
            inner(globals, &mut step);
            globals.depth -= 1;
            if globals.depth > 0 {
                outer(globals);
            }
        }

        let mut globals = Globals {
            total: 0,
            depth: input.pop().expect("invalid input"),
            output: vec![],
        };
        outer(&mut globals);
        globals.output.push(globals.total);

        assert!(input.is_empty());
        globals.output
    },
};

const COLLATZ_TEXT: &str = r#"
    var n, steps;
    begin
        ?n;
        steps := 0;
        while n > 1 do
        begin
            if odd n then n := 3 * n + 1;
            n := n / 2;
            steps := steps + 1
        end;
        !steps
    end.
"#;

pub const COLLATZ_DATA: Data = Data {
    text: COLLATZ_TEXT,
    exec_fn: |mut input| {
        let mut n = input.pop().expect("invalid input");
        let mut steps = 0;
        while n > 1 {
            if n % 2 != 0 {
                n = 3 * n + 1;
            }
            n = do_div(n, 2);
            steps += 1;
        }

        assert!(input.is_empty());
        vec![steps]
    },
};

const POWER_MOD_TEXT: &str = r#"
    var base, exponent, modulus, result;
    procedure reduce;
        base := base - base / modulus * modulus;
    begin
        ?base;
        ?exponent;
        ?modulus;
        result := 1;
        call reduce;
        while exponent > 0 do
        begin
            if odd exponent then result := result * base - result * base / modulus * modulus;
            base := base * base;
            call reduce;
            exponent := exponent / 2
        end;
        !result
    end.
"#;

pub const POWER_MOD_DATA: Data = Data {
    text: POWER_MOD_TEXT,
    exec_fn: |mut input| {
        let mut base = input.pop().expect("invalid input");
        let mut exponent = input.pop().expect("invalid input");
        let modulus = input.pop().expect("invalid input");

        let mut result = 1;
        base = do_mod(base, modulus);
        while exponent > 0 {
            if exponent % 2 != 0 {
                result = do_mod(result * base, modulus);
            }
            base = do_mod(base * base, modulus);
            exponent = do_div(exponent, 2);
        }

        assert!(input.is_empty());
        vec![result]
    },
};

const AVERAGE_TEXT: &str = r#"
    var x, sum, count;
    begin
        sum := 0;
        count := 0;
        ?x;
        while x # 0 do
        begin
            sum := sum + x;
            count := count + 1;
            ?x
        end;
        !count;
        !sum;
        if count > 0 then !sum / count
    end.
"#;

pub const AVERAGE_DATA: Data = Data {
    text: AVERAGE_TEXT,
    exec_fn: |mut input| {
        let values: Vec<i64> = std::iter::from_fn(|| input.pop())
            .take_while(|&x| x != 0)
            .collect();

        let count = values.len() as i64;
        let sum: i64 = values.iter().sum();

        let mut output = vec![count, sum];
        if count > 0 {
            output.push(do_div(sum, count));
        }

        output
    },
};
