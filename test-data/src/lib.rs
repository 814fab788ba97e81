use std::collections::HashMap;
use lazy_static::lazy_static;
use rand::prelude::*;
use rand::distributions::Uniform;

pub struct ProgramData {
    pub text: &'static str,
    pub valid_io: Vec<(Vec<i64>, Vec<i64>)>,
}

mod data;

fn generate_program_data(data: data::Data, inputs: Vec<Vec<i64>>) -> ProgramData {
    let io = inputs.into_iter()
        .map(|v| {
            let result = data.exec(v.clone());
            (v, result)
        });

    ProgramData {
        text: data.text(),
        valid_io: io.collect(),
    }
}

pub fn get_all_programs() -> HashMap<String, ProgramData> {
    let mut programs = HashMap::new();

    let mut rng = rand::rngs::StdRng::seed_from_u64(420);

    let dist = Uniform::new(1, 1_000_000_000_000);
    let small = Uniform::new(1, 1_000_000);

    programs.insert(
        String::from("factorial"),
        generate_program_data(
            data::FACTORIAL_DATA,
            (0..=20).map(|i| vec![i]).collect()
        ),
    );

    programs.insert(
        String::from("fib"),
        generate_program_data(
            data::FIB_DATA,
            (0..=30).map(|i| vec![i]).collect()
        ),
    );

    programs.insert(
        String::from("gcd"),
        generate_program_data(
            data::GCD_DATA,
            {
                let mut base = vec![
                    vec![12, 18],
                    vec![17, 5],
                    vec![7, 0],
                    vec![1_071, 462],
                ];

                base.extend(std::iter::repeat_with(|| {
                    vec![small.sample(&mut rng), small.sample(&mut rng)]
                }).take(10));

                base
            }
        ),
    );

    programs.insert(
        String::from("primes"),
        generate_program_data(
            data::PRIMES_DATA,
            vec![
                vec![-5],
                vec![0],
                vec![2],
                vec![3],
                vec![10],
                vec![50],
                vec![100],
                vec![150],
            ]
        ),
    );

    programs.insert(
        String::from("bitstring"),
        generate_program_data(
            data::BITSTRING_DATA,
            {
                let mut base = vec![
                    vec![-3],
                    vec![0],
                    vec![10],
                    vec![1345601],
                ];

                base.extend(std::iter::repeat_with(|| vec![dist.sample(&mut rng)]).take(10));

                base
            }
        ),
    );

    programs.insert(
        String::from("div_mod"),
        generate_program_data(
            data::DIV_MOD_DATA,
            vec![
                vec![1, 0],
                vec![7, 2, -7, 2, 7, -2, -7, -2, 0, 0],
                {
                    let mut base = vec![
                        33, 7,
                        33, 8,
                        -33, 9,
                        12, 14,
                    ];

                    base.extend(std::iter::repeat_with(|| {
                        let divisor = small.sample(&mut rng);
                        let divisor = if rng.gen() { -divisor } else { divisor };
                        let dividend = dist.sample(&mut rng) - 500_000_000_000;
                        vec![dividend, divisor]
                    }).flatten().take(10 * 2));

                    base.push(1);
                    base.push(0);

                    base
                },
            ]
        ),
    );

    programs.insert(
        String::from("numbers"),
        generate_program_data(
            data::NUMBERS_DATA,
            (-20..=20).map(|i| vec![i]).collect()
        ),
    );

    programs.insert(
        String::from("nesting"),
        generate_program_data(
            data::NESTING_DATA,
            (1..=6).map(|i| vec![i]).collect()
        ),
    );

    programs.insert(
        String::from("collatz"),
        generate_program_data(
            data::COLLATZ_DATA,
            {
                let mut base: Vec<_> = (1..=30).map(|i| vec![i]).collect();

                base.extend(std::iter::repeat_with(|| vec![small.sample(&mut rng)]).take(10));

                base
            }
        ),
    );

    programs.insert(
        String::from("power_mod"),
        generate_program_data(
            data::POWER_MOD_DATA,
            {
                let mut base = vec![
                    vec![2, 10, 1_000],
                    vec![3, 0, 7],
                    vec![5, 3, 1],
                    vec![1234567890, 1234567890987, 987654321],
                ];

                base.extend(std::iter::repeat_with(|| {
                    vec![dist.sample(&mut rng), dist.sample(&mut rng), small.sample(&mut rng) + 1]
                }).take(10));

                base
            }
        ),
    );

    programs.insert(
        String::from("average"),
        generate_program_data(
            data::AVERAGE_DATA,
            vec![
                vec![0],
                vec![4, 0],
                vec![1, 2, 3, 4, 0],
                vec![-5, 2, 0],
                std::iter::repeat_with(|| small.sample(&mut rng)).take(20).chain(Some(0)).collect(),
            ]
        ),
    );

    programs
}

lazy_static! {
    pub static ref TEST_DATA: HashMap<String, ProgramData> = get_all_programs();
}
